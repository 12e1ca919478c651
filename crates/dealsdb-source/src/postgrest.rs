//! Rendering of typed predicates into PostgREST horizontal filters.
//!
//! The whole conjunction becomes a single `and=(...)` query parameter:
//!
//! ```text
//! and=(or(and(sale_price.gte.0,sale_price.lte.3000),and(price.gte.0,price.lte.3000)),ai_category.eq."Gaming")
//! ```
//!
//! String operands are always double-quoted so commas, dots and parentheses
//! in user input cannot break the logic tree.

use dealsdb_core::{Predicate, StoreKey};

use crate::error::SourceError;

/// Renders a conjunction of predicates as the value of an `and` parameter.
///
/// Returns `Ok(None)` for an empty conjunction.
///
/// # Errors
///
/// Returns [`SourceError::InvalidQuery`] for store-name predicates, which
/// must be resolved to an id first, and for empty `AnyOf` groups.
pub fn render_conjunction(predicates: &[Predicate]) -> Result<Option<String>, SourceError> {
    if predicates.is_empty() {
        return Ok(None);
    }
    let parts = predicates
        .iter()
        .map(render)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(format!("({})", parts.join(","))))
}

fn render(predicate: &Predicate) -> Result<String, SourceError> {
    Ok(match predicate {
        Predicate::Range { field, min, max } => {
            let col = field.column();
            format!("and({col}.gte.{min},{col}.lte.{max})")
        }
        Predicate::InSet { field, values } => {
            let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
            format!("{}.in.({})", field.column(), quoted.join(","))
        }
        Predicate::Equals { field, value } => format!("{}.eq.{}", field.column(), quote(value)),
        Predicate::Contains { field, needle } => {
            format!("{}.{}", field.column(), literal_ilike(needle, false))
        }
        Predicate::Store(StoreKey::Id(id)) => format!("store_id.eq.{id}"),
        Predicate::Store(StoreKey::Name(name)) => {
            return Err(SourceError::InvalidQuery(format!(
                "store name \"{name}\" must be resolved before rendering"
            )));
        }
        Predicate::AnyOf(inner) => {
            if inner.is_empty() {
                return Err(SourceError::InvalidQuery("empty or() group".to_string()));
            }
            let parts = inner.iter().map(render).collect::<Result<Vec<_>, _>>()?;
            format!("or({})", parts.join(","))
        }
    })
}

/// Case-insensitive match operator and operand taking `text` literally:
/// whole-value equality when `whole`, substring otherwise.
///
/// PostgREST turns every `*` of a LIKE pattern into `%`, so text holding a
/// `*` is matched with an escaped regex instead.
pub(crate) fn literal_ilike(text: &str, whole: bool) -> String {
    let mut pattern = String::with_capacity(text.len() * 2 + 2);
    if text.contains('*') {
        if whole {
            pattern.push('^');
        }
        for c in text.chars() {
            if c.is_ascii_punctuation() {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        if whole {
            pattern.push('$');
        }
        return format!("imatch.{}", quote(&pattern));
    }
    if !whole {
        pattern.push('*');
    }
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    if !whole {
        pattern.push('*');
    }
    format!("ilike.{}", quote(&pattern))
}

/// Double-quotes a string operand, escaping `\` and `"`.
pub(crate) fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
