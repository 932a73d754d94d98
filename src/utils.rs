/// space separated sequence of counts, as written in `Dimensions` attributes
pub(crate) fn join_counts(values: &[usize]) -> String {
    values
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// space separated sequence of floating point values
pub(crate) fn join_times(values: &[f64]) -> String {
    let mut buffer = ryu::Buffer::new();
    values
        .iter()
        .map(|value| buffer.format(*value).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
