//! Idempotent structural edits
//!
//! These operate on an in-memory [`XmlDocument`]; persisting the result is
//! the job of [`crate::xml::edit`]. Every primitive is safe to re-run:
//! removals find nothing the second time, and `insert_if_absent` converges to
//! exactly one matching element.

use crate::errors::{invalid_path, malformed_xml, Result};
use crate::xml::document::{XmlDocument, XmlElement, XmlNode};
use crate::xml::path::{element_at_mut, XmlPath};

impl XmlDocument {
    /// Remove every `candidate` child of `container` for which `predicate`
    /// holds, continuing past the first match so duplicate or legacy entries
    /// go too. A missing container removes nothing.
    pub fn remove_matching<F>(
        &mut self,
        container: &str,
        candidate: &str,
        mut predicate: F,
    ) -> Result<Vec<XmlElement>>
    where
        F: FnMut(&XmlElement) -> bool,
    {
        let Some(parent) = self.find_first_mut(container)? else {
            return Ok(Vec::new());
        };
        Ok(parent.remove_children_where(|el| el.local_name() == candidate && predicate(el)))
    }

    /// Append a copy of `external` as the last child of `container`
    ///
    /// `source` is the document `external` came from; namespace prefixes it
    /// uses that this document does not declare are carried over onto the
    /// copy. No duplicate check: remove first for replace semantics.
    ///
    /// Returns false, leaving the document untouched, if the container is absent.
    pub fn append_raw(
        &mut self,
        container: &str,
        external: &XmlElement,
        source: Option<&XmlDocument>,
    ) -> Result<bool> {
        let imported = match source {
            Some(source) => self.import(external, source),
            None => external.clone(),
        };
        match self.find_first_mut(container)? {
            Some(parent) => {
                parent.append_child(imported);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Append the element produced by `build` to `container` unless
    /// `check_path` already matches something. Returns whether it inserted.
    pub fn insert_if_absent<F>(&mut self, check_path: &str, container: &str, build: F) -> Result<bool>
    where
        F: FnOnce(&XmlDocument) -> XmlElement,
    {
        if self.find_first(check_path)?.is_some() {
            return Ok(false);
        }
        let element = build(self);
        let parent = self.find_first_mut(container)?.ok_or_else(|| {
            malformed_xml(
                "insert_if_absent",
                format!("container '{}' not found", container),
            )
        })?;
        parent.append_child(element);
        Ok(true)
    }

    /// Remove every direct `bean` child of `container` whose `id` equals
    /// `id`, ignoring case
    pub fn remove_bean_by_id(&mut self, container: &str, id: &str) -> Result<Vec<XmlElement>> {
        self.remove_matching(container, "bean", |bean| {
            bean.attribute("id")
                .is_some_and(|value| value.eq_ignore_ascii_case(id))
        })
    }

    /// Create any missing elements along a plain path such as
    /// `/project/build/plugins`. The first step must name the root.
    pub fn ensure_path(&mut self, path: &str) -> Result<()> {
        let parsed = XmlPath::parse(path)?;
        if !parsed.is_plain() {
            return Err(invalid_path(path, "ensure_path takes names only"));
        }
        let names = parsed.plain_names();
        if self.root().local_name() != names[0] && self.root().name() != names[0] {
            return Err(malformed_xml(
                "ensure_path",
                format!(
                    "expected root element <{}>, found <{}>",
                    names[0],
                    self.root().name()
                ),
            ));
        }

        let mut location: Vec<usize> = Vec::new();
        for name in &names[1..] {
            let current = element_at_mut(self.root_mut(), &location)
                .ok_or_else(|| malformed_xml("ensure_path", "lost track of element"))?;
            let existing = current.children().iter().position(|node| {
                node.as_element()
                    .is_some_and(|el| el.local_name() == name || el.name() == name)
            });
            let index = match existing {
                Some(index) => index,
                None => {
                    current.append_child(XmlElement::new(name.clone()));
                    current
                        .children()
                        .iter()
                        .rposition(|node| matches!(node, XmlNode::Element(_)))
                        .ok_or_else(|| malformed_xml("ensure_path", "append failed"))?
                }
            };
            location.push(index);
        }
        Ok(())
    }

    /// Copy `external` for insertion here, declaring on the copy any
    /// namespace prefix it uses that this document lacks but `source` has
    pub fn import(&self, external: &XmlElement, source: &XmlDocument) -> XmlElement {
        let mut copy = external.clone();
        let mut prefixes = Vec::new();
        collect_prefixes(external, &mut prefixes);
        for prefix in prefixes {
            let declared_here = self.namespace_uri(&prefix).is_some()
                || copy.attribute(&format!("xmlns:{}", prefix)).is_some();
            if declared_here {
                continue;
            }
            if let Some(uri) = source.namespace_uri(&prefix) {
                copy.set_attribute(format!("xmlns:{}", prefix), uri);
            }
        }
        copy
    }

    /// Declare `xmlns:prefix` on the root if missing; returns whether it added it
    pub fn declare_namespace(&mut self, prefix: &str, uri: &str) -> bool {
        if self.namespace_uri(prefix).is_some() {
            return false;
        }
        self.root_mut().set_attribute(format!("xmlns:{}", prefix), uri);
        true
    }
}

/// Human-readable summary of a removal, empty when nothing was removed
pub fn removal_description<F>(what: &str, removed: &[XmlElement], label: F) -> String
where
    F: Fn(&XmlElement) -> String,
{
    if removed.is_empty() {
        return String::new();
    }
    let labels: Vec<String> = removed.iter().map(label).collect();
    format!("Removal of {}: {}", what, labels.join(", "))
}

fn collect_prefixes(el: &XmlElement, out: &mut Vec<String>) {
    let mut push = |p: &str| {
        if p != "xml" && p != "xmlns" && !out.iter().any(|x| x == p) {
            out.push(p.to_string());
        }
    };
    if let Some(prefix) = el.prefix() {
        push(prefix);
    }
    for (name, _) in el.attributes() {
        if let Some((prefix, _)) = name.split_once(':') {
            push(prefix);
        }
    }
    for child in el.child_elements() {
        collect_prefixes(child, out);
    }
}
