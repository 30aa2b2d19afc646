use crate::xml::arena::XmlDocument;
use crate::xml::namespaces::W;
use indextree::NodeId;

/// A paragraph with no content: its only element child, if any, is a `w:pPr`
/// that does not carry a section break.
pub fn is_empty_paragraph(doc: &XmlDocument, p: NodeId) -> bool {
    if !doc.is_named(p, W::NS, "p") {
        return false;
    }
    let has_significant_text = doc.children(p).any(|child| {
        doc.get(child)
            .is_some_and(|d| d.text_content().is_some() && !d.is_insignificant_whitespace())
    });
    if has_significant_text {
        return false;
    }
    doc.child_elements(p).all(|child| {
        doc.is_named(child, W::NS, "pPr")
            && doc.find_elements(child, W::NS, "sectPr").next().is_none()
    })
}

/// Shorten the run of empty paragraphs at the end of `body` to `cap`.
///
/// The final body-level `w:sectPr` is not content and is skipped when looking
/// for the tail. Leading members of the run are removed; the `cap` paragraphs
/// closest to the end stay untouched. Returns the number removed.
pub fn trim_trailing_empty_paragraphs(doc: &mut XmlDocument, body: NodeId, cap: usize) -> usize {
    let mut blocks: Vec<NodeId> = doc.child_elements(body).collect();
    if blocks
        .last()
        .is_some_and(|&last| doc.is_named(last, W::NS, "sectPr"))
    {
        blocks.pop();
    }

    let run_len = blocks
        .iter()
        .rev()
        .take_while(|&&block| is_empty_paragraph(doc, block))
        .count();
    if run_len <= cap {
        return 0;
    }

    let run_start = blocks.len() - run_len;
    let surplus = run_len - cap;
    for &paragraph in &blocks[run_start..run_start + surplus] {
        doc.remove_subtree(paragraph);
    }

    log::debug!(
        "trimmed {} trailing empty paragraph(s), kept {}",
        surplus,
        cap
    );
    surplus
}
