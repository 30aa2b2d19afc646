use super::cleanup::trim_trailing_empty_paragraphs;
use super::document::{require_document_body, WmlDocument};
use super::footer::{build_footer, relationship_references};
use super::locator::{
    find_marked_tables, find_signature_tables, find_tables, is_signature_table,
    select_footer_source,
};
use super::sanitize::{strip_signature_decoration, StripCounts};
use super::sections::{apply_section_properties, SectionStats};
use super::settings::RelocationSettings;
use crate::error::Result;
use crate::package::content_types::{self, content_type_values, CONTENT_TYPES_PART};
use crate::package::relationships::{
    self, find_relationship, next_relationship_id, parse_relationships, relationship_types,
    Relationship,
};
use crate::package::OoxmlPackage;
use crate::xml::builder::serialize_bytes;
use crate::xml::namespaces::W;
use serde::Serialize;

/// What one relocation run did to a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelocationReport {
    /// Signature tables found in the body before anything moved.
    pub signature_tables: usize,
    /// Marker tables left in the body with their images stripped.
    pub tables_stripped: usize,
    pub body_stripped: StripCounts,
    pub footer_stripped: StripCounts,
    pub footer_part: String,
    pub footer_relationship_id: String,
    pub footer_source_is_signature_table: bool,
    /// The package already carried the relocated footer; nothing was moved.
    pub already_relocated: bool,
    pub empty_paragraphs_removed: usize,
    pub manifest_updated: bool,
    pub relationship_added: bool,
    /// Relationships copied into the footer's own relationship part.
    pub footer_relationships: usize,
    pub sections: SectionStats,
}

/// Moves the trailing signature table of a document into a footer part and
/// repairs the package references that depend on it.
pub struct FooterRelocator;

impl FooterRelocator {
    /// Run the whole transformation on `document`.
    ///
    /// Every check that can fail runs before the package is touched, so on
    /// error `document` is unchanged.
    pub fn relocate(
        document: &mut WmlDocument,
        settings: &RelocationSettings,
    ) -> Result<RelocationReport> {
        let main_part = document.main_part_name().to_string();
        let rels_part = document.main_relationships_part();
        let footer_part = document.sibling_part(&settings.footer_part_name);
        let package = document.package();

        let mut doc = document.main_document()?;
        let body = require_document_body(&doc, &main_part)?;

        let mut rels_doc = package.get_xml_part(&rels_part)?;
        let rels = parse_relationships(&rels_doc).map_err(|e| e.in_part(&rels_part))?;
        let existing_rel_id =
            find_relationship(&rels, &main_part, &footer_part, relationship_types::FOOTER)
                .map(|rel| rel.id.clone());

        let mut report = RelocationReport {
            footer_part: footer_part.clone(),
            ..RelocationReport::default()
        };
        let mut updates: Vec<(String, Vec<u8>)> = Vec::new();

        report.signature_tables = find_signature_tables(&doc, body, settings).count();
        let marked_tables: Vec<_> = find_marked_tables(&doc, body, &settings.marker).collect();
        log::info!(
            "found {} signature table(s), {} table(s) with marker '{}'",
            report.signature_tables,
            marked_tables.len(),
            settings.marker
        );

        let last_is_signature = find_tables(&doc, body)
            .last()
            .is_some_and(|tbl| is_signature_table(&doc, tbl, settings));
        let relocated_id = existing_rel_id
            .clone()
            .filter(|_| !last_is_signature && holds_relocated_table(package, &footer_part));

        let rel_id = if let Some(rel_id) = relocated_id {
            log::info!(
                "{} already references {} as {}; skipping extraction",
                main_part,
                footer_part,
                rel_id
            );
            report.already_relocated = true;
            for &table in &marked_tables {
                report.body_stripped +=
                    strip_signature_decoration(&mut doc, table, &settings.shading_fill);
                report.tables_stripped += 1;
            }
            rel_id
        } else {
            let selection = select_footer_source(&doc, body, settings)?;
            report.footer_source_is_signature_table = selection.is_signature_table;

            if existing_rel_id.is_some() && package.has_part(&footer_part) {
                log::warn!("replacing the existing content of {}", footer_part);
            }
            for &table in marked_tables.iter().filter(|&&t| t != selection.table) {
                report.body_stripped +=
                    strip_signature_decoration(&mut doc, table, &settings.shading_fill);
                report.tables_stripped += 1;
            }

            let footer = build_footer(&doc, selection.table, &settings.shading_fill);
            report.footer_stripped = footer.stripped;
            doc.remove_subtree(selection.table);

            let rel_id = existing_rel_id.unwrap_or_else(|| next_relationship_id(&rels));
            let footer_target =
                relative_target(&main_part, &footer_part).unwrap_or(settings.footer_part_name.as_str());
            report.relationship_added = relationships::add_relationship(
                &mut rels_doc,
                &main_part,
                &Relationship::new(&rel_id, relationship_types::FOOTER, footer_target),
            )
            .map_err(|e| e.in_part(&rels_part))?;

            // References left in the footer resolve against the footer's own
            // relationship part.
            let carried: Vec<Relationship> = relationship_references(&footer.document, footer.table)
                .iter()
                .filter_map(|id| rels.iter().find(|rel| &rel.id == id).cloned())
                .collect();
            report.footer_relationships = carried.len();
            if !carried.is_empty() {
                let footer_rels = relationships::relationships_document(&carried);
                updates.push((
                    relationships::relationships_part_for(&footer_part),
                    serialize_bytes(&footer_rels)?,
                ));
            }

            updates.push((footer_part.clone(), serialize_bytes(&footer.document)?));
            rel_id
        };
        report.footer_relationship_id = rel_id.clone();

        report.empty_paragraphs_removed =
            trim_trailing_empty_paragraphs(&mut doc, body, settings.empty_paragraph_cap);

        let mut manifest = package.get_xml_part(CONTENT_TYPES_PART)?;
        report.manifest_updated = content_types::add_override(
            &mut manifest,
            &footer_part,
            content_type_values::WORD_FOOTER,
        )?;
        if report.footer_relationships > 0 {
            report.manifest_updated |= content_types::add_default(
                &mut manifest,
                "rels",
                content_type_values::RELATIONSHIPS,
            )?;
        }

        report.sections =
            apply_section_properties(&mut doc, &rel_id, &settings.margins, &main_part)?;

        if report.manifest_updated {
            updates.push((CONTENT_TYPES_PART.to_string(), serialize_bytes(&manifest)?));
        }
        if report.relationship_added {
            updates.push((rels_part, serialize_bytes(&rels_doc)?));
        }
        updates.push((main_part, serialize_bytes(&doc)?));

        let package = document.package_mut();
        for (path, bytes) in updates {
            package.set_part(&path, bytes);
        }

        log::info!(
            "relocated footer to {} ({}), {} section(s), {} empty paragraph(s) trimmed",
            report.footer_part,
            report.footer_relationship_id,
            report.sections.sections,
            report.empty_paragraphs_removed
        );
        Ok(report)
    }
}

/// Target of `target_part` relative to the directory of `source_part`, when
/// it lives in that directory tree.
fn relative_target<'a>(source_part: &str, target_part: &'a str) -> Option<&'a str> {
    match source_part.rsplit_once('/') {
        Some((dir, _)) => target_part
            .strip_prefix(dir)
            .and_then(|rest| rest.strip_prefix('/')),
        None => Some(target_part),
    }
}

/// True when `footer_part` exists and its root holds a table. Only consulted
/// when the body no longer ends in a signature table, so a template footer
/// laid out as a table never hides a pending relocation.
fn holds_relocated_table(package: &OoxmlPackage, footer_part: &str) -> bool {
    if !package.has_part(footer_part) {
        return false;
    }
    let Ok(footer) = package.get_xml_part(footer_part) else {
        log::warn!("{} exists but is not well-formed; rebuilding it", footer_part);
        return false;
    };
    footer.root().is_some_and(|root| {
        footer.is_named(root, W::NS, "ftr")
            && footer
                .child_elements(root)
                .any(|child| footer.is_named(child, W::NS, "tbl"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_targets() {
        assert_eq!(relative_target("word/document.xml", "word/footer1.xml"), Some("footer1.xml"));
        assert_eq!(relative_target("word/document.xml", "other/footer1.xml"), None);
        assert_eq!(relative_target("document.xml", "footer1.xml"), Some("footer1.xml"));
    }
}
