use itertools::Itertools;
use solr_client::{escape_query_chars, SortOrder};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SortParseError {
    #[error("sort instruction is missing a direction: {0}")]
    MissingDirection(String),
    #[error("invalid sort direction: {0}")]
    InvalidDirection(String),
}

/// Arithmetic operator tokens recognized inside a sort expression, in
/// priority order, paired with the backend function they compile to.
/// The tokens are matched against the escaped payload, hence the
/// leading backslash.
const ARITHMETIC_OPS: [(&str, &str); 5] = [
    ("\\^", "pow"),
    ("\\*", "product"),
    ("\\/", "div"),
    ("\\+", "sum"),
    ("\\-", "sub"),
];

/// Compiles a `sort:` operator payload into ordered (expression,
/// direction) pairs. Instructions are separated by `;` and read
/// `<expression>,<direction>`; the direction keyword is matched
/// case-sensitively and anything unrecognized fails the whole request.
pub fn compile_sort(payload: &str) -> Result<Vec<(String, SortOrder)>, SortParseError> {
    let escaped = escape_query_chars(payload);
    let mut sorts = Vec::new();

    for instruction in escaped.split("\\;") {
        let parts: Vec<&str> = instruction.split(',').collect();
        let expression = compile_expression(parts[0]);
        let direction = parts
            .get(1)
            .ok_or_else(|| SortParseError::MissingDirection(instruction.to_string()))?;
        let order = match *direction {
            "asc" => SortOrder::Asc,
            "desc" => SortOrder::Desc,
            other => return Err(SortParseError::InvalidDirection(other.to_string())),
        };
        sorts.push((expression, order));
    }

    Ok(sorts)
}

/// Rewrites the first (highest-priority) arithmetic operator found into
/// its function-call form, e.g. `a\^b` into `pow(a,b)`. Only one
/// rewrite happens per expression; mixing operator kinds is not
/// supported and leftover escaped tokens stay untransformed.
fn compile_expression(raw: &str) -> String {
    for (token, function) in ARITHMETIC_OPS {
        if raw.contains(token) {
            return format!("{}({})", function, raw.split(token).join(","));
        }
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_plain_field_sorts() {
        let sorts = compile_sort("imgTstamp,asc").unwrap();
        assert_eq!(sorts, vec![("imgTstamp".to_string(), SortOrder::Asc)]);
    }

    #[test]
    fn splits_multiple_instructions() {
        let sorts = compile_sort("imgTitle,desc;imgTstamp,asc").unwrap();
        assert_eq!(
            sorts,
            vec![
                ("imgTitle".to_string(), SortOrder::Desc),
                ("imgTstamp".to_string(), SortOrder::Asc),
            ]
        );
    }

    #[test]
    fn compiles_power_expression() {
        let sorts = compile_sort("imgTitle^imgAlt,asc").unwrap();
        assert_eq!(
            sorts,
            vec![("pow(imgTitle,imgAlt)".to_string(), SortOrder::Asc)]
        );
    }

    #[test]
    fn compiles_every_operator_kind() {
        assert_eq!(compile_sort("a*b,asc").unwrap()[0].0, "product(a,b)");
        assert_eq!(compile_sort("a/b,asc").unwrap()[0].0, "div(a,b)");
        assert_eq!(compile_sort("a+b,asc").unwrap()[0].0, "sum(a,b)");
        assert_eq!(compile_sort("a-b,asc").unwrap()[0].0, "sub(a,b)");
    }

    #[test]
    fn joins_repeated_operators_into_one_call() {
        assert_eq!(compile_sort("a^b^c,desc").unwrap()[0].0, "pow(a,b,c)");
    }

    // Mixing operator kinds is a documented limitation: only the
    // highest-priority operator is rewritten, the rest stay escaped.
    #[test]
    fn mixed_operators_rewrite_only_once() {
        assert_eq!(compile_sort("a^b*c,asc").unwrap()[0].0, "pow(a,b\\*c)");
    }

    #[test]
    fn rejects_unknown_direction() {
        assert_eq!(
            compile_sort("imgTitle,ASC"),
            Err(SortParseError::InvalidDirection("ASC".to_string()))
        );
        assert_eq!(
            compile_sort("imgTitle,upwards"),
            Err(SortParseError::InvalidDirection("upwards".to_string()))
        );
    }

    #[test]
    fn rejects_missing_direction() {
        assert!(matches!(
            compile_sort("imgTitle"),
            Err(SortParseError::MissingDirection(_))
        ));
    }
}
