//! Keyset predicates and cursor conversion shared by the repositories.
//!
//! A decoded cursor is converted into the Rust type of the sort column. When
//! its variant does not fit the column, the conversion yields `None` and the
//! request is served as a first page.

use mopl_core::pagination::DecodedCursor;
use uuid::Uuid;

/// Applies the keyset predicate and the `(column, id)` ordering to a boxed
/// query.
///
/// Ascending: `column > v OR (column = v AND id > id_after)`; descending uses
/// `<`. The id column breaks ties in the same direction as the sort column.
macro_rules! keyset {
    ($query:expr, $column:expr, $id:expr, $direction:expr, $cursor:expr) => {{
        let query = $query;
        let query = match $cursor {
            Some((value, id_after)) if $direction.is_ascending() => query.filter(
                $column
                    .gt(value.clone())
                    .or($column.eq(value).and($id.gt(id_after))),
            ),
            Some((value, id_after)) => query.filter(
                $column
                    .lt(value.clone())
                    .or($column.eq(value).and($id.lt(id_after))),
            ),
            None => query,
        };

        if $direction.is_ascending() {
            query.order(($column.asc(), $id.asc()))
        } else {
            query.order(($column.desc(), $id.desc()))
        }
    }};
}

pub(crate) use keyset;

/// Cursor for a text column.
pub(crate) fn text_cursor(cursor: Option<&DecodedCursor>) -> Option<(String, Uuid)> {
    let cursor = cursor?;
    Some((cursor.value.as_text()?.to_owned(), cursor.id_after))
}

/// Cursor for a `timestamptz` column.
pub(crate) fn timestamp_cursor(
    cursor: Option<&DecodedCursor>,
) -> Option<(jiff_diesel::Timestamp, Uuid)> {
    let cursor = cursor?;
    let value = jiff_diesel::Timestamp::from(cursor.value.as_timestamp()?);
    Some((value, cursor.id_after))
}

/// Cursor for a `float8` column.
pub(crate) fn real_cursor(cursor: Option<&DecodedCursor>) -> Option<(f64, Uuid)> {
    let cursor = cursor?;
    Some((cursor.value.as_real()?, cursor.id_after))
}

/// Cursor for an `int4` counter column.
pub(crate) fn integer_cursor(cursor: Option<&DecodedCursor>) -> Option<(i32, Uuid)> {
    let cursor = cursor?;
    Some((cursor.value.as_i32()?, cursor.id_after))
}

/// Cursor for a boolean column.
pub(crate) fn bool_cursor(cursor: Option<&DecodedCursor>) -> Option<(bool, Uuid)> {
    let cursor = cursor?;
    Some((cursor.value.as_bool()?, cursor.id_after))
}

/// Builds an `ILIKE` pattern matching `keyword` as a literal substring.
///
/// `\`, `%` and `_` are escaped so user input cannot widen the match.
pub(crate) fn contains_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}


#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use mopl_core::sort::SortValue;

    use super::*;

    fn cursor(value: SortValue) -> DecodedCursor {
        DecodedCursor {
            value,
            id_after: Uuid::from_u128(7),
        }
    }

    #[test]
    fn pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("kim"), "%kim%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn where_clause_stops_at_ordering() {
        let rendered = r#"SELECT "a"."id" FROM "a" WHERE ("a"."x" = $1) ORDER BY "a"."id" ASC -- binds: [1]"#;
        assert_eq!(sql::where_clause(rendered), r#"("a"."x" = $1)"#);
        assert_eq!(sql::binds(rendered), "[1]");
        assert_eq!(sql::where_clause(r#"SELECT 1 FROM "a" -- binds: []"#), "");
    }

    #[test]
    fn converters_follow_column_type() {
        let at = Timestamp::from_second(1_700_000_000).unwrap();

        let text = cursor(SortValue::from("alice"));
        assert_eq!(
            text_cursor(Some(&text)),
            Some(("alice".to_owned(), Uuid::from_u128(7)))
        );

        let time = cursor(SortValue::from(at));
        let (value, _) = timestamp_cursor(Some(&time)).unwrap();
        assert_eq!(Timestamp::from(value), at);

        let count = cursor(SortValue::Real(42.0));
        assert_eq!(integer_cursor(Some(&count)), Some((42, Uuid::from_u128(7))));
        assert_eq!(real_cursor(Some(&count)), Some((42.0, Uuid::from_u128(7))));

        let locked = cursor(SortValue::Bool(true));
        assert_eq!(bool_cursor(Some(&locked)), Some((true, Uuid::from_u128(7))));
    }

    #[test]
    fn mismatched_variant_is_first_page() {
        let text = cursor(SortValue::from("alice"));
        assert!(timestamp_cursor(Some(&text)).is_none());
        assert!(real_cursor(Some(&text)).is_none());
        assert!(bool_cursor(Some(&text)).is_none());

        let fractional = cursor(SortValue::Real(2.5));
        assert!(integer_cursor(Some(&fractional)).is_none());

        assert!(text_cursor(None).is_none());
    }
}
