//! Anchor/alias/merge resolver: two fixed-point passes over the flat
//! element list (spec.md §4.3).
//!
//! Grounded on the teacher's `resolver::AdvancedResolver` for the general
//! shape of a dispatch-driven resolve pass, and on `composer`'s
//! anchor-carrying `Node` for the concept of an anchor as a named subtree.
//! The two-pass fixed-point algorithm itself has no teacher counterpart:
//! PyYAML's merge-key handling lives in `constructor.py`, which this port
//! never translated, so the range-copy/range-splice mechanics here are new,
//! built directly against spec.md §4.3 and the open-question decisions in
//! DESIGN.md.

use crate::element::{matching_close, Element, ElementList, Marker};
use crate::error::{Error, Result, YamlProblem};

/// Runs both resolver passes to a fixed point.
pub fn resolve(elements: ElementList) -> Result<ElementList> {
    let elements = resolve_aliases(elements)?;
    let elements = resolve_merges(elements)?;
    Ok(elements)
}

/// Pass 1: expand every alias whose key is not `<<` by copying the
/// subtree rooted at its matching anchor.
pub fn resolve_aliases(mut elements: ElementList) -> Result<ElementList> {
    loop {
        let pos = elements
            .iter()
            .position(|e| e.alias.is_some() && e.key.as_deref() != Some("<<"));
        let Some(pos) = pos else { break };

        let name = elements[pos].alias.clone().unwrap();
        let anchor_pos = elements
            .iter()
            .position(|e| e.anchor.as_deref() == Some(name.as_str()))
            .ok_or_else(|| Error::yaml(YamlProblem::AnchorNotFound, elements[pos].line))?;

        let anchor = elements[anchor_pos].clone();
        let alias_indent = elements[pos].indent;

        if anchor.is_scalar() {
            let replaced = &mut elements[pos];
            replaced.value = anchor.value.clone();
            replaced.tag = anchor.tag.clone();
            replaced.alias = None;
            continue;
        }

        // Anchor heads a subtree: copy the contiguous bracketed range.
        let end = matching_close(&elements, anchor_pos)
            .ok_or_else(|| Error::yaml(YamlProblem::AnchorNotFound, elements[pos].line))?;
        let subtree = &elements[anchor_pos..=end];

        if subtree_references(subtree, &name) {
            return Err(Error::yaml(YamlProblem::AliasRecursive, elements[pos].line));
        }

        let rebase = alias_indent as i64 - anchor.indent as i64;
        let mut copy: Vec<Element> = subtree
            .iter()
            .map(|e| {
                let mut c = e.clone();
                c.indent = (c.indent as i64 + rebase).max(0) as usize;
                c
            })
            .collect();
        // The copy's own key comes from the alias site, not the anchor
        // definition; the anchor name is dropped so it doesn't collide
        // with the original definition.
        if let Some(first) = copy.first_mut() {
            first.key = elements[pos].key.clone();
            first.anchor = None;
        }

        elements.splice(pos..=pos, copy.drain(..));
    }
    Ok(elements)
}

/// Pass 2: expand every `<<` merge key by field-wise union with override.
pub fn resolve_merges(mut elements: ElementList) -> Result<ElementList> {
    loop {
        let pos = elements.iter().position(|e| e.key.as_deref() == Some("<<"));
        let Some(pos) = pos else { break };

        let merge_el = elements[pos].clone();
        let name = merge_el
            .alias
            .clone()
            .ok_or_else(|| Error::yaml(YamlProblem::MergeInvalid, merge_el.line))?;

        let anchor_pos = elements
            .iter()
            .position(|e| e.anchor.as_deref() == Some(name.as_str()))
            .ok_or_else(|| Error::yaml(YamlProblem::AnchorNotFound, merge_el.line))?;
        let anchor = elements[anchor_pos].clone();
        if anchor.is_scalar() {
            return Err(Error::yaml(YamlProblem::MergeSingleValue, merge_el.line));
        }
        let anchor_end = matching_close(&elements, anchor_pos)
            .ok_or_else(|| Error::yaml(YamlProblem::MergeSingleValue, merge_el.line))?;

        // Merge parent: nearest preceding element with strictly smaller indent.
        let parent_indent = elements[..pos]
            .iter()
            .rev()
            .find(|e| e.indent < merge_el.indent)
            .map(|e| e.indent)
            .unwrap_or(0);

        let rebase = parent_indent as i64 + 1 - anchor.indent as i64;
        let anchor_children: Vec<Element> = elements[anchor_pos + 1..anchor_end]
            .iter()
            .map(|e| {
                let mut c = e.clone();
                c.indent = (c.indent as i64 + rebase).max(0) as usize;
                c
            })
            .collect();
        let anchor_fields = split_fields(&anchor_children, parent_indent + 1);

        // The merge key's full sibling run (all fields of the merge
        // parent at the merge key's indent) becomes the override set;
        // it is removed wholesale and replaced by the merged result.
        let merge_indent = merge_el.indent;
        let run_start = elements[..pos]
            .iter()
            .rposition(|e| e.indent < merge_indent)
            .map(|i| i + 1)
            .unwrap_or(0);
        let run_end = {
            let mut j = pos;
            while j < elements.len() && elements[j].indent >= merge_indent {
                j += 1;
            }
            j
        };
        let sibling_run: Vec<Element> = elements[run_start..run_end].to_vec();
        let mut overrides = split_fields(&sibling_run, merge_indent);
        // The merge key itself is not a real field.
        overrides.retain(|f| f.first().and_then(|e| e.key.as_deref()) != Some("<<"));

        // Decision (DESIGN.md #2): an existing sequence at an override key
        // replaces the anchor's sequence wholesale; existing mappings fall
        // through to plain override-wins-else-anchor-fills semantics below
        // (no recursive deep-merge).
        let anchor_fields = drop_sequence_shadowed(anchor_fields, &overrides);

        let mut merged: Vec<Element> = Vec::new();
        let mut consumed_override_keys: Vec<Option<String>> = Vec::new();
        for field in &anchor_fields {
            let key = field.first().and_then(|e| e.key.clone());
            if let Some(over) = overrides
                .iter()
                .find(|o| key.is_some() && o.first().and_then(|e| e.key.clone()) == key)
            {
                merged.extend(over.clone());
                consumed_override_keys.push(key);
            } else {
                merged.extend(field.clone());
            }
        }
        // Orphan overrides (no anchor counterpart) keep their original
        // relative order, appended after the merged anchor fields.
        for over in &overrides {
            let key = over.first().and_then(|e| e.key.clone());
            if !consumed_override_keys.contains(&key) {
                merged.extend(over.clone());
            }
        }

        elements.splice(run_start..run_end, merged);
    }
    Ok(elements)
}

/// Splits a flat run of sibling elements (all at `indent`, or the open
/// marker of a nested container at `indent`) into one `Vec<Element>` per
/// field, each including its full nested subtree.
fn split_fields(elements: &[Element], indent: usize) -> Vec<Vec<Element>> {
    let mut fields = Vec::new();
    let mut i = 0;
    while i < elements.len() {
        if elements[i].is_open() && elements[i].indent == indent {
            let end = matching_close(elements, i).unwrap_or(elements.len() - 1);
            fields.push(elements[i..=end].to_vec());
            i = end + 1;
        } else {
            fields.push(vec![elements[i].clone()]);
            i += 1;
        }
    }
    fields
}

fn drop_sequence_shadowed(fields: Vec<Vec<Element>>, overrides: &[Vec<Element>]) -> Vec<Vec<Element>> {
    fields
        .into_iter()
        .filter(|f| {
            let is_seq = matches!(f.first().and_then(|e| e.marker), Some(Marker::SequenceStart));
            if !is_seq {
                return true;
            }
            let key = f.first().and_then(|e| e.key.clone());
            !overrides
                .iter()
                .any(|o| key.is_some() && o.first().and_then(|e| e.key.clone()) == key)
        })
        .collect()
}

fn subtree_references(subtree: &[Element], name: &str) -> bool {
    subtree.iter().any(|e| e.alias.as_deref() == Some(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;

    #[test]
    fn expands_simple_alias() {
        let elements = build("a: &base\n  x: 1\n  y: 2\nb: *base\n").unwrap();
        let resolved = resolve(elements).unwrap();
        assert!(resolved.iter().all(|e| e.alias.is_none()));
        let b_pos = resolved.iter().position(|e| e.key.as_deref() == Some("b")).unwrap();
        assert!(matches!(resolved[b_pos].marker, Some(Marker::MappingStart)));
    }

    #[test]
    fn merges_with_override() {
        let elements = build("a: &a\n  x: 1\n  y: 2\nb:\n  <<: *a\n  y: 99\n  z: 3\n").unwrap();
        let resolved = resolve(elements).unwrap();
        let b = resolved.iter().position(|e| e.key.as_deref() == Some("b")).unwrap();
        let end = matching_close(&resolved, b).unwrap();
        let keys: Vec<&str> = resolved[b + 1..end]
            .iter()
            .filter_map(|e| e.key.as_deref())
            .collect();
        assert!(keys.contains(&"x"));
        assert!(keys.contains(&"y"));
        assert!(keys.contains(&"z"));
        let y = resolved[b + 1..end]
            .iter()
            .find(|e| e.key.as_deref() == Some("y"))
            .unwrap();
        assert_eq!(y.value.as_ref().unwrap().text, "99");
    }

    #[test]
    fn anchor_not_found_errors() {
        let elements = build("b: *missing\n").unwrap();
        let err = resolve(elements).unwrap_err();
        assert_eq!(err.line(), 1);
    }
}
