#![no_main]

use libfuzzer_sys::fuzz_target;

use head::{AttributeKind, HeadFragment, HeadMarkup, TagKind, TagRecord, reduce_fragments};
use head_dom::{HeadDocument, MemoryDocument, apply_patches, plan_commit};

const NAMES: [&str; 8] = [
    "name", "rel", "href", "content", "charset", "property", "src", "itemprop",
];
const VALUES: [&str; 6] = ["", "a", "A", "canonical", "stylesheet", "<&\"'>"];

fn fragments(data: &[u8]) -> Vec<HeadFragment> {
    let mut out = Vec::new();
    for chunk in data.chunks(4) {
        if chunk[0] % 5 == 0 || out.is_empty() {
            out.push(HeadFragment::new());
        }
        let Some(fragment) = out.pop() else { continue };
        let pick = |i: usize| chunk.get(i).copied().unwrap_or(0) as usize;
        let fragment = match chunk[0] % 3 {
            0 => fragment.title(VALUES[pick(1) % VALUES.len()]),
            1 => fragment.attribute(
                AttributeKind::ALL[pick(1) % AttributeKind::ALL.len()],
                NAMES[pick(2) % NAMES.len()],
                VALUES[pick(3) % VALUES.len()],
            ),
            _ => {
                let kind = TagKind::ALL[pick(1) % TagKind::ALL.len()];
                let mut record = TagRecord::new()
                    .attr(NAMES[pick(2) % NAMES.len()], VALUES[pick(3) % VALUES.len()]);
                if pick(2) % 2 == 0 {
                    record = record.content(VALUES[pick(3) % VALUES.len()]);
                }
                fragment.tag(kind, record)
            }
        };
        out.push(fragment);
    }
    out
}

fuzz_target!(|data: &[u8]| {
    let owned = fragments(data);
    let refs: Vec<&HeadFragment> = owned.iter().collect();
    let state = reduce_fragments(&refs);
    assert_eq!(state, reduce_fragments(&refs));
    let markup = HeadMarkup::from_state(&state);
    for kind in TagKind::ALL {
        let _ = markup.tags(kind).to_string();
    }
    let _ = markup.title.to_string();

    let mut document = MemoryDocument::new();
    let patches = plan_commit(&document, &state);
    if apply_patches(&mut document, patches).is_err() {
        return;
    }
    assert!(plan_commit(&document, &state).is_empty());
    let _ = document.title();
});
