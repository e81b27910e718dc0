use arrow::datatypes::DataType;

/// A CSV cell without surrounding whitespace or one pair of leftover
/// outer quotes. A lone `"` is kept as-is.
pub fn clean_cell(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner,
        None => trimmed,
    }
}

/// Infer the narrowest Arrow dtype for a cleaned, non-empty cell.
pub fn infer_arrow_dtype_from_str(s: &str) -> DataType {
    if s.parse::<i64>().is_ok() {
        DataType::Int64
    } else if s.parse::<f64>().is_ok() {
        DataType::Float64
    } else {
        DataType::Utf8
    }
}

/// Widen two inferred dtypes to one that holds both: Int64 < Float64 < Utf8.
pub fn widen_dtype(a: &DataType, b: &DataType) -> DataType {
    match (a, b) {
        (DataType::Utf8, _) | (_, DataType::Utf8) => DataType::Utf8,
        (DataType::Float64, _) | (_, DataType::Float64) => DataType::Float64,
        _ => DataType::Int64,
    }
}
