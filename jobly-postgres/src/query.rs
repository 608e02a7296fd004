use jobly_core::{FieldMap, JoblyError, Result, Stash};
use serde_json::Value;

/// A SQL fragment and the values bound to its `$n` placeholders, in placeholder order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clause {
    pub clause: String,
    pub values: Vec<Value>,
}

impl Clause {
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// `WHERE <clause>`, or an empty string when there is nothing to filter on.
    pub fn where_sql(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clause)
        }
    }
}

/// Build the SET list of a partial update.
///
/// Each field becomes `"<column>"=$n`, numbered from 1 in the order of `fields`. `translations`
/// maps request field names to column names; a field without an entry is used as the column
/// name unchanged. The returned values line up with the placeholders, so a caller appending
/// its own key binds it at `$<values.len() + 1>`.
pub fn sql_for_partial_update(fields: &FieldMap, translations: &[(&str, &str)]) -> Result<Clause> {
    if fields.is_empty() {
        return Err(JoblyError::validation("no data"));
    }

    let mut cols = Vec::with_capacity(fields.len());
    let mut values = Vec::with_capacity(fields.len());

    for (idx, (key, val)) in fields.iter().enumerate() {
        let column = translations
            .iter()
            .find(|(field, _)| *field == key)
            .map(|(_, column)| *column)
            .unwrap_or(key);
        cols.push(format!("{}=${}", quote_ident(column), idx + 1));
        values.push(val.clone());
    }

    Ok(Clause {
        clause: cols.join(", "),
        values,
    })
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Reject any field not listed in `allowed`.
pub fn check_fields(fields: &FieldMap, allowed: &[&str]) -> Result<()> {
    match fields.keys().find(|key| !allowed.contains(key)) {
        Some(key) => Err(JoblyError::validation(format!("invalid field: {key}"))),
        None => Ok(()),
    }
}

/// Reject non-integer values for `integer` columns. Null is left to the column's constraints.
pub fn check_integers(fields: &FieldMap, integers: &[&str]) -> Result<()> {
    for field in integers {
        match fields.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::Number(n)) if n.is_i64() => {}
            Some(_) => return Err(JoblyError::validation(format!("invalid value: {field}"))),
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Case-insensitive substring match.
    Contains,
    AtLeast,
    Above,
    AtMost,
    /// `<column> <> 0` when the flag is true. Binds nothing.
    NonZero,
}

impl FilterOp {
    fn operator(self) -> &'static str {
        match self {
            FilterOp::Contains => "ILIKE",
            FilterOp::AtLeast => ">=",
            FilterOp::Above => ">",
            FilterOp::AtMost => "<=",
            FilterOp::NonZero => "<>",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FilterRule {
    pub key: &'static str,
    pub column: &'static str,
    pub op: FilterOp,
}

/// The filters one entity accepts in `find_all`.
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub rules: &'static [FilterRule],
    /// `(lower, upper)` keys that must satisfy `lower <= upper` when both are given.
    pub range: Option<(&'static str, &'static str)>,
}

impl FilterSpec {
    fn rule(&self, key: &str) -> Option<&FilterRule> {
        self.rules.iter().find(|r| r.key == key)
    }
}

enum Predicate {
    Bound(Value),
    Fixed,
    Skip,
}

/// Build a conjunctive WHERE list from request filters.
///
/// Every supplied filter contributes one predicate, joined with `AND` in the order the filters
/// were given. Placeholders count only predicates that bind a value. No filters yields an
/// empty clause.
pub fn build_filter(filters: &Stash, spec: &FilterSpec) -> Result<Clause> {
    let mut active = Vec::with_capacity(filters.len());
    for (key, raw) in filters {
        let rule = spec
            .rule(key)
            .ok_or_else(|| JoblyError::validation(format!("invalid filter: {key}")))?;
        active.push((rule, coerce(rule, raw)?));
    }

    if let Some((lower, upper)) = spec.range {
        let bound = |key: &str| {
            active.iter().find_map(|(rule, pred)| match pred {
                Predicate::Bound(v) if rule.key == key => v.as_f64(),
                _ => None,
            })
        };
        if let (Some(lo), Some(hi)) = (bound(lower), bound(upper)) {
            if lo > hi {
                return Err(JoblyError::validation("invalid min/max range"));
            }
        }
    }

    let mut predicates = Vec::with_capacity(active.len());
    let mut values = Vec::new();

    for (rule, pred) in active {
        match pred {
            Predicate::Bound(v) => {
                values.push(v);
                predicates.push(format!(
                    "{} {} ${}",
                    rule.column,
                    rule.op.operator(),
                    values.len()
                ));
            }
            Predicate::Fixed => {
                predicates.push(format!("{} {} 0", rule.column, rule.op.operator()));
            }
            Predicate::Skip => continue,
        }
    }

    Ok(Clause {
        clause: predicates.join(" AND "),
        values,
    })
}

fn coerce(rule: &FilterRule, raw: &Value) -> Result<Predicate> {
    let invalid = || JoblyError::validation(format!("invalid filter value: {}", rule.key));

    match rule.op {
        FilterOp::Contains => {
            let text = match raw {
                Value::String(s) => s.clone(),
                Value::Number(_) | Value::Bool(_) => raw.to_string(),
                _ => return Err(invalid()),
            };
            Ok(Predicate::Bound(Value::String(format!("%{text}%"))))
        }
        FilterOp::AtLeast | FilterOp::Above | FilterOp::AtMost => match raw {
            Value::Number(_) => Ok(Predicate::Bound(raw.clone())),
            Value::String(s) => parse_number(s.trim()).map(Predicate::Bound).ok_or_else(invalid),
            _ => Err(invalid()),
        },
        FilterOp::NonZero => match raw {
            Value::Bool(true) => Ok(Predicate::Fixed),
            Value::Bool(false) => Ok(Predicate::Skip),
            Value::String(s) if s == "true" => Ok(Predicate::Fixed),
            Value::String(s) if s == "false" => Ok(Predicate::Skip),
            _ => Err(invalid()),
        },
    }
}

fn parse_number(s: &str) -> Option<Value> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::from(i));
    }
    s.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}
