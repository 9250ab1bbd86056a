//! `replication_configuration { role, rules { ... } }` becomes
//! `aws_s3_bucket_replication_configuration { role, rule { ... } }`.

use hcl_edit::structure::{Body, Structure};

use super::{Notes, filter};
use crate::document::{attr, block, copy_attr, detach_structure, expr_text, rename_attr, toggle};

pub(super) fn build(body: &Body, notes: &mut Notes) -> Vec<Structure> {
    let mut out = Vec::new();
    for structure in body.iter() {
        match structure {
            Structure::Attribute(source) if source.key.as_str() == "role" => {
                out.push(copy_attr(source));
            }
            Structure::Block(rules) if rules.ident.as_str() == "rules" => {
                out.push(rule(&rules.body, notes));
            }
            other => notes.unmapped("replication_configuration", other),
        }
    }
    out
}

fn rule(body: &Body, notes: &mut Notes) -> Structure {
    let mut out = Vec::new();
    for structure in body.iter() {
        match structure {
            Structure::Attribute(source) => match source.key.as_str() {
                "id" | "prefix" | "status" | "priority" => out.push(copy_attr(source)),
                "delete_marker_replication_status" => out.push(block(
                    "delete_marker_replication",
                    [rename_attr("status", source)],
                )),
                _ => notes.unmapped("replication rules", structure),
            },
            Structure::Block(inner) => match inner.ident.as_str() {
                "destination" => out.push(destination(&inner.body, notes)),
                "filter" => out.push(
                    filter::from_body(&inner.body)
                        .unwrap_or_else(|| block("filter", Vec::<Structure>::new())),
                ),
                "source_selection_criteria" => {
                    out.push(source_selection_criteria(&inner.body, notes));
                }
                _ => notes.unmapped("replication rules", structure),
            },
        }
    }
    block("rule", out)
}

fn destination(body: &Body, notes: &mut Notes) -> Structure {
    let mut out = Vec::new();
    for structure in body.iter() {
        match structure {
            Structure::Attribute(source) => match source.key.as_str() {
                "account_id" => out.push(rename_attr("account", source)),
                "bucket" | "storage_class" => out.push(copy_attr(source)),
                "replica_kms_key_id" => {
                    out.push(block("encryption_configuration", [copy_attr(source)]));
                }
                _ => notes.unmapped("replication destination", structure),
            },
            Structure::Block(inner) => match inner.ident.as_str() {
                "access_control_translation" => out.push(detach_structure(structure)),
                "metrics" => out.push(timed("metrics", "event_threshold", &inner.body, notes)),
                "replication_time" => {
                    out.push(timed("replication_time", "time", &inner.body, notes));
                }
                _ => notes.unmapped("replication destination", structure),
            },
        }
    }
    block("destination", out)
}

/// `{ minutes, status }` becomes `{ status, <wrapper> { minutes } }`.
fn timed(name: &'static str, wrapper: &'static str, body: &Body, notes: &mut Notes) -> Structure {
    let mut out = Vec::new();
    for structure in body.iter() {
        match structure {
            Structure::Attribute(source) if source.key.as_str() == "status" => {
                out.push(copy_attr(source));
            }
            Structure::Attribute(source) if source.key.as_str() == "minutes" => {
                out.push(block(wrapper, [copy_attr(source)]));
            }
            other => notes.unmapped(name, other),
        }
    }
    block(name, out)
}

fn source_selection_criteria(body: &Body, notes: &mut Notes) -> Structure {
    let mut out = Vec::new();
    for structure in body.iter() {
        match structure {
            Structure::Block(inner) if inner.ident.as_str() == "sse_kms_encrypted_objects" => {
                let mut objects = Vec::new();
                for nested in inner.body.iter() {
                    match nested {
                        Structure::Attribute(source) if source.key.as_str() == "enabled" => {
                            match toggle(&source.value, "Enabled", "Disabled") {
                                Some(status) => objects.push(attr("status", status)),
                                None => notes.push(format!(
                                    "sse_kms_encrypted_objects status left unset, enabled = {} \
                                     is not a literal boolean",
                                    expr_text(&source.value)
                                )),
                            }
                        }
                        other => notes.unmapped("sse_kms_encrypted_objects", other),
                    }
                }
                out.push(block("sse_kms_encrypted_objects", objects));
            }
            other => notes.unmapped("source_selection_criteria", other),
        }
    }
    block("source_selection_criteria", out)
}
