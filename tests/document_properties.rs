//! Integration tests for document invariants across modules.

use richpage::document::Segment;
use richpage::header_footer::{to_letters, to_roman};
use richpage::{
    paginate, Document, EditOp, EmbeddedObject, HeaderFooterManager, PageGeometry,
    PageNumberFormat, Paragraph, UndoManager,
};

/// Small deterministic generator for edit sequences.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % (bound as u64 + 1)) as usize
    }
}

const WORDS: [&str; 6] = ["lorem", " ", "ipsum\n", "é", "dolor sit", "\n"];
const STYLES: [&str; 3] = ["", "font-weight: bold;", "font-style: italic;"];

fn expected_len(doc: &Document) -> usize {
    let units: usize = doc
        .paragraphs()
        .iter()
        .flat_map(Paragraph::segments)
        .map(|segment| match segment {
            Segment::Text { content, .. } => content.chars().count(),
            Segment::Object { .. } => 1,
        })
        .sum();
    units + doc.paragraph_count() - 1
}

fn assert_normalized(doc: &Document) {
    for para in doc.paragraphs() {
        for segment in para.segments() {
            assert!(!(segment.is_text() && segment.is_empty()), "empty text run");
        }
        for pair in para.segments().windows(2) {
            let mergeable = pair[0].is_text() && pair[1].is_text() && pair[0].style() == pair[1].style();
            assert!(!mergeable, "adjacent runs share a style: {:?}", pair);
        }
    }
}

fn random_edits(seed: u64, steps: usize) -> Document {
    let mut rng = Lcg(seed);
    let mut doc = Document::new();
    for _ in 0..steps {
        let len = doc.len();
        match rng.below(4) {
            0 | 1 => {
                let word = WORDS[rng.below(WORDS.len() - 1)];
                let style = STYLES[rng.below(STYLES.len() - 1)];
                doc.insert_text(rng.below(len), word, style).unwrap();
            }
            2 => {
                let a = rng.below(len);
                let b = rng.below(len);
                doc.delete_range(a.min(b), a.max(b)).unwrap();
            }
            3 => doc.insert_object(rng.below(len), EmbeddedObject::image("x.png")).unwrap(),
            _ => {
                let a = rng.below(len);
                let b = rng.below(len);
                let style = STYLES[rng.below(STYLES.len() - 1)];
                doc.set_style(a.min(b), a.max(b), style).unwrap();
            }
        }
    }
    doc
}

#[test]
fn test_offsets_never_drift() {
    for seed in 0..20 {
        let doc = random_edits(seed, 60);
        let len = doc.len();
        assert_eq!(len, expected_len(&doc));
        assert_eq!(doc.text_in_range(0, len).unwrap().chars().count(), len);
        assert_normalized(&doc);
    }
}

#[test]
fn test_set_style_is_idempotent() {
    for seed in 0..10 {
        let mut doc = random_edits(seed, 40);
        let len = doc.len();
        let (start, end) = (len / 3, len - len / 3);
        doc.set_style(start, end, "font-weight: bold;").unwrap();
        let once = doc.clone();
        doc.set_style(start, end, "font-weight: bold;").unwrap();
        assert_eq!(doc, once);
    }
}

#[test]
fn test_insert_then_delete_restores_empty_document() {
    let mut doc = Document::new();
    let before = doc.clone();
    doc.insert_text(0, "hello", "font-weight: bold;").unwrap();
    doc.delete_range(0, 5).unwrap();
    assert_eq!(doc, before);
    assert_eq!(doc.len(), 0);
    assert_eq!(doc.paragraph(0).unwrap().segments().len(), 0);
}

#[test]
fn test_style_merge_across_ranges() {
    let mut doc = Document::new();
    doc.insert_text(0, "abcdefgh", "").unwrap();
    doc.set_style(0, 2, "bold").unwrap();
    doc.set_style(5, 8, "bold").unwrap();
    doc.set_style(2, 5, "bold").unwrap();
    assert_eq!(
        doc.paragraph(0).unwrap().segments(),
        &[Segment::text("abcdefgh", "bold")]
    );
}

#[test]
fn test_every_edit_undoes_exactly() {
    for seed in 0..10 {
        let mut doc = random_edits(seed, 30);
        let mut rng = Lcg(seed + 100);
        let mut history = UndoManager::new(1000);
        history.set_merge_window(0);
        let mut snapshots = Vec::new();

        for _ in 0..20 {
            let len = doc.len();
            let a = rng.below(len);
            let b = rng.below(len);
            let op = match rng.below(3) {
                0 => EditOp::insert(a, "new\ntext", "font-size: 18px;"),
                1 => EditOp::delete(a.min(b), a.max(b)),
                2 => EditOp::set_style(a.min(b), a.max(b), "font-style: italic;"),
                _ => EditOp::transaction(vec![
                    EditOp::delete(a.min(b), a.max(b)),
                    EditOp::insert(a.min(b), "swap", ""),
                ]),
            };
            snapshots.push(doc.clone());
            history.begin_transaction("edit", Default::default());
            let (_, reverse) = doc.apply_with_reverse(op.clone()).unwrap();
            history.record_edit(op, reverse);
            history.commit();
        }

        while let Some(expected) = snapshots.pop() {
            history.undo(&mut doc).unwrap();
            assert_eq!(doc, expected);
        }
        assert!(!history.can_undo());
    }
}

#[test]
fn test_page_number_systems() {
    let letters: Vec<_> = [1, 26, 27, 52, 53, 702, 703].iter().map(|&n| to_letters(n)).collect();
    assert_eq!(letters, ["a", "z", "aa", "az", "ba", "zz", "aaa"]);

    for (n, roman) in [(1, "I"), (4, "IV"), (9, "IX"), (40, "XL"), (1994, "MCMXCIV")] {
        assert_eq!(to_roman(n).unwrap(), roman);
    }
    assert!(PageNumberFormat::Roman.try_format(4000).is_err());
    assert_eq!(PageNumberFormat::Roman.format(4000), "4000");
}

#[test]
fn test_pages_cover_the_document() {
    let doc = random_edits(7, 120);
    let mut headers = HeaderFooterManager::new();
    headers.set_different_first_page(true);
    headers.set_header("Cover", true);
    headers.set_header("Body", false);

    let geometry = PageGeometry::new(200.0, 160.0, 20.0);
    let pages = paginate(&doc, geometry, &headers, &|para: &Paragraph, _: f32| {
        12.0 + para.len() as f32
    });

    assert_eq!(pages.first().map(|p| p.content.start), Some(0));
    assert_eq!(pages.last().map(|p| p.content.end), Some(doc.len()));
    assert_eq!(pages.last().map(|p| p.paragraphs.end), Some(doc.paragraph_count()));
    for pair in pages.windows(2) {
        // Consecutive pages are separated by exactly one paragraph boundary
        assert_eq!(pair[0].content.end + 1, pair[1].content.start);
        assert_eq!(pair[0].paragraphs.end, pair[1].paragraphs.start);
    }
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.index, i + 1);
        assert_eq!(page.header, if i == 0 { "Cover" } else { "Body" });
    }
}
