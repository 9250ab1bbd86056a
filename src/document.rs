//! Small helpers over the `hcl-edit` tree used by the transform rules.
//!
//! New nodes are created without decor so the printer falls back to its
//! default spacing; indentation is restored afterwards by [`crate::format`].

use hcl_edit::Ident;
use hcl_edit::expr::Expression;
use hcl_edit::parser::parse_expr;
use hcl_edit::repr::{Decor, Decorate, Decorated};
use hcl_edit::structure::{Attribute, Block, BlockLabel, Body, Structure};
use itertools::Itertools;
use regex::Regex;

use crate::error::RuleError;

pub(crate) fn body_of(structures: impl IntoIterator<Item = Structure>) -> Body {
    let mut body = Body::new();
    for structure in structures {
        body.push(structure);
    }
    body
}

/// `key = value` with a fixed key.
pub(crate) fn attr(key: &'static str, value: Expression) -> Structure {
    Attribute::new(Decorated::new(Ident::new(key)), value).into()
}

/// Copy of `attr` under its own key, value detached from its old layout.
pub(crate) fn copy_attr(attr: &Attribute) -> Structure {
    Attribute::new(Decorated::new(attr.key.value().clone()), detach(&attr.value)).into()
}

/// Copy of `attr` under a new key.
pub(crate) fn rename_attr(key: &'static str, attr: &Attribute) -> Structure {
    self::attr(key, detach(&attr.value))
}

pub(crate) fn block(ident: &'static str, structures: impl IntoIterator<Item = Structure>) -> Structure {
    let mut block = Block::new(Decorated::new(Ident::new(ident)));
    block.body = body_of(structures);
    block.into()
}

/// `dynamic "<label>" { ... }`
pub(crate) fn dynamic_block(label: &str, structures: impl IntoIterator<Item = Structure>) -> Structure {
    let mut block = Block::new(Decorated::new(Ident::new("dynamic")));
    block.labels = vec![string_label(label)];
    block.body = body_of(structures);
    block.into()
}

/// Clone a structure and drop the blank lines and comments in front of it.
pub(crate) fn detach_structure(structure: &Structure) -> Structure {
    let mut structure = structure.clone();
    match &mut structure {
        Structure::Attribute(attr) => *attr.decor_mut() = Decor::default(),
        Structure::Block(block) => *block.decor_mut() = Decor::default(),
    }
    structure
}

/// Add a `# TODO:` line above a structure, below any comments it already has.
/// A structure that already carries the same line is left as it is.
pub(crate) fn annotate(structure: &mut Structure, note: &str) {
    let line = format!("# TODO: {}\n", flatten(note));
    let decor = match structure {
        Structure::Attribute(attr) => attr.decor_mut(),
        Structure::Block(block) => block.decor_mut(),
    };
    let existing = decor.prefix().map(|prefix| prefix.to_string()).unwrap_or_default();
    if existing.contains(&line) {
        return;
    }
    decor.set_prefix(format!("{existing}{line}"));
}

pub(crate) fn string_label(label: &str) -> BlockLabel {
    BlockLabel::String(Decorated::new(label.to_string()))
}

pub(crate) fn string_lit(value: &str) -> Expression {
    Expression::String(Decorated::new(value.to_string()))
}

/// Clone an expression and drop its surrounding whitespace and comments.
pub(crate) fn detach(expr: &Expression) -> Expression {
    let mut expr = expr.clone();
    *expr.decor_mut() = Decor::default();
    expr
}

/// Parse generated expression text such as `aws_s3_bucket.logs[count.index].id`.
pub(crate) fn parse(text: &str) -> Result<Expression, RuleError> {
    let mut expr = parse_expr(text).map_err(|err| RuleError::Expression {
        text: text.to_string(),
        message: err.to_string(),
    })?;
    *expr.decor_mut() = Decor::default();
    Ok(expr)
}

/// The value of a literal `true`/`false`; anything else (variables, strings) is `None`.
pub(crate) fn literal_bool(expr: &Expression) -> Option<bool> {
    match expr {
        Expression::Bool(value) => Some(*value.value()),
        _ => None,
    }
}

/// Map a literal boolean toggle onto a pair of enum strings.
pub(crate) fn toggle(expr: &Expression, on: &str, off: &str) -> Option<Expression> {
    literal_bool(expr).map(|enabled| string_lit(if enabled { on } else { off }))
}

pub(crate) fn flatten(text: &str) -> String {
    text.split_whitespace().join(" ")
}

/// Single-line rendering of an expression, for notes and logs.
pub(crate) fn expr_text(expr: &Expression) -> String {
    flatten(&expr.to_string())
}

/// Single-line rendering of an attribute or block, for notes.
pub(crate) fn structure_text(structure: &Structure) -> String {
    flatten(&body_of([structure.clone()]).to_string())
}

/// The text of an attribute that embeds another document.
///
/// Quoted strings yield their unescaped value; heredocs and function calls
/// such as `jsonencode([...])` yield their printed source.
pub(crate) fn embedded_text(expr: &Expression) -> String {
    match expr {
        Expression::String(value) => value.value().clone(),
        other => other.to_string(),
    }
}

/// Rewrite `<iterator>.value` / `<iterator>.key` to `each.value` / `each.key`.
///
/// Used when the content of a `dynamic` block is lifted into a resource that
/// carries the block's `for_each` itself.
pub(crate) fn rewrite_iterator(
    structures: Vec<Structure>,
    iterator: &str,
) -> Result<Vec<Structure>, RuleError> {
    let pattern = format!(r"(^|[^\w.]){}\.(value|key)\b", regex::escape(iterator));
    let pattern = Regex::new(&pattern).map_err(|err| RuleError::Expression {
        text: iterator.to_string(),
        message: err.to_string(),
    })?;
    structures
        .into_iter()
        .map(|structure| rewrite_structure(structure, &pattern))
        .collect()
}

fn rewrite_structure(structure: Structure, pattern: &Regex) -> Result<Structure, RuleError> {
    Ok(match structure {
        Structure::Attribute(mut attr) => {
            attr.value = rewrite_expr(attr.value, pattern)?;
            attr.into()
        }
        Structure::Block(mut block) => {
            let inner = std::mem::take(&mut block.body)
                .into_iter()
                .map(|structure| rewrite_structure(structure, pattern))
                .collect::<Result<Vec<_>, _>>()?;
            block.body = body_of(inner);
            block.into()
        }
    })
}

fn rewrite_expr(expr: Expression, pattern: &Regex) -> Result<Expression, RuleError> {
    let text = expr.to_string();
    if !pattern.is_match(&text) {
        return Ok(expr);
    }
    let rewritten = pattern.replace_all(&text, "${1}each.${2}");
    parse(rewritten.trim())
}

/// The parts of a `dynamic "<label>" { for_each, iterator, content { ... } }` block.
#[derive(Debug)]
pub(crate) struct DynamicBlock<'a> {
    pub label: &'a str,
    pub for_each: Option<&'a Expression>,
    pub iterator: Option<&'a Expression>,
    pub content: Option<&'a Body>,
    /// Anything else found in the block, e.g. a second `content`.
    pub others: Vec<&'a Structure>,
}

impl<'a> DynamicBlock<'a> {
    pub fn parse(block: &'a Block) -> Option<Self> {
        if block.ident.as_str() != "dynamic" || block.labels.len() != 1 {
            return None;
        }

        let mut dynamic = DynamicBlock {
            label: block.labels[0].as_str(),
            for_each: None,
            iterator: None,
            content: None,
            others: Vec::new(),
        };
        for structure in block.body.iter() {
            match structure {
                Structure::Attribute(attr) if attr.key.as_str() == "for_each" => {
                    dynamic.for_each = Some(&attr.value);
                }
                Structure::Attribute(attr) if attr.key.as_str() == "iterator" => {
                    dynamic.iterator = Some(&attr.value);
                }
                Structure::Block(inner)
                    if inner.ident.as_str() == "content" && dynamic.content.is_none() =>
                {
                    dynamic.content = Some(&inner.body);
                }
                other => dynamic.others.push(other),
            }
        }
        Some(dynamic)
    }

    /// The name the content refers to: the `iterator` argument, or the label.
    pub fn iterator_name(&self) -> String {
        self.iterator
            .map(expr_text)
            .unwrap_or_else(|| self.label.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl_edit::parser::parse_body;
    use yare::parameterized;

    fn value_of(source: &str) -> Expression {
        let body = parse_body(source).unwrap();
        body.get_attribute("x").unwrap().value.clone()
    }

    #[parameterized(
        literal_true = { "x = true", Some(true) },
        literal_false = { "x = false", Some(false) },
        quoted = { "x = \"true\"", None },
        variable = { "x = var.enabled", None },
    )]
    fn test_literal_bool(source: &str, expected: Option<bool>) {
        assert_eq!(literal_bool(&value_of(source)), expected);
    }

    #[test]
    fn test_embedded_text_unescapes_strings() {
        let expr = value_of(r#"x = "[{\"Condition\": {}}]""#);
        assert_eq!(embedded_text(&expr), r#"[{"Condition": {}}]"#);
    }

    #[test]
    fn test_embedded_text_prints_calls() {
        let expr = value_of("x = jsonencode([{ Condition = {} }])");
        let text = embedded_text(&expr);
        assert!(text.trim_start().starts_with("jsonencode("));
        assert!(text.contains("Condition"));
    }

    #[test]
    fn test_flatten_collapses_whitespace() {
        assert_eq!(flatten("  a {\n    b = 1\n  }\n"), "a { b = 1 }");
    }

    #[test]
    fn test_structure_text_is_single_line() {
        let body = parse_body("grant {\n  id = \"abc\"\n  type = \"CanonicalUser\"\n}\n").unwrap();
        let structure = body.iter().next().unwrap();
        assert_eq!(
            structure_text(structure),
            r#"grant { id = "abc" type = "CanonicalUser" }"#
        );
    }

    #[parameterized(
        value = { "x = logging.value", "each.value" },
        key_in_template = { r#"x = "logs/${logging.key}/""#, r#""logs/${each.key}/""# },
        nested_value = { "x = logging.value.bucket", "each.value.bucket" },
        unrelated = { "x = other_logging.value", "other_logging.value" },
        attribute_access = { "x = var.logging.value", "var.logging.value" },
    )]
    fn test_rewrite_iterator(source: &str, expected: &str) {
        let body = parse_body(source).unwrap();
        let rewritten = rewrite_iterator(body.into_iter().collect(), "logging").unwrap();
        let attr = rewritten[0].as_attribute().unwrap();
        assert_eq!(expr_text(&attr.value), expected);
    }

    #[test]
    fn test_rewrite_iterator_descends_into_blocks() {
        let body = parse_body("index_document {\n  suffix = site.value.index\n}\n").unwrap();
        let rewritten = rewrite_iterator(body.into_iter().collect(), "site").unwrap();
        assert_eq!(
            structure_text(&rewritten[0]),
            "index_document { suffix = each.value.index }"
        );
    }

    #[test]
    fn test_dynamic_block_parts() {
        let body = parse_body(
            r#"
dynamic "logging" {
  for_each = var.logs
  iterator = log
  content {
    target_bucket = log.value
  }
}
"#,
        )
        .unwrap();
        let block = body.iter().next().unwrap().as_block().unwrap();
        let dynamic = DynamicBlock::parse(block).unwrap();
        assert_eq!(dynamic.label, "logging");
        assert_eq!(dynamic.for_each.map(expr_text).as_deref(), Some("var.logs"));
        assert_eq!(dynamic.iterator_name(), "log");
        assert!(dynamic.content.is_some());
        assert!(dynamic.others.is_empty());
    }

    #[test]
    fn test_generated_nodes_print() {
        let structure = block(
            "versioning_configuration",
            [attr("status", string_lit("Enabled"))],
        );
        assert_eq!(
            structure_text(&structure),
            r#"versioning_configuration { status = "Enabled" }"#
        );
    }

    #[test]
    fn test_parse_rejects_invalid_text() {
        assert!(matches!(
            parse("aws_s3_bucket.1bad.id ="),
            Err(RuleError::Expression { .. })
        ));
    }
}
