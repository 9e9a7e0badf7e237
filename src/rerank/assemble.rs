use super::error::InvalidInput;
use super::types::{IndexMap, ResultSet, ScoredResult};

/// Attaches original indices to `scores`, orders them by descending score
/// and keeps the first `top_n`.
///
/// The sort is stable, so equal scores stay in ascending original-index
/// order.
pub fn assemble(
    scores: Vec<f32>,
    index_map: &IndexMap,
    top_n: i64,
) -> Result<ResultSet, InvalidInput> {
    let limit = validate_top_n(top_n)?;
    debug_assert_eq!(
        scores.len(),
        index_map.len(),
        "one score per indexed document"
    );

    let mut results: Vec<ScoredResult> = index_map
        .iter()
        .zip(scores)
        .map(|(index, score)| ScoredResult { index, score })
        .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(limit);

    Ok(ResultSet::new(results))
}

/// Converts a caller-supplied `top_n` into a result limit.
pub fn validate_top_n(top_n: i64) -> Result<usize, InvalidInput> {
    if top_n <= 0 {
        return Err(InvalidInput::NonPositiveTopN { top_n });
    }
    Ok(usize::try_from(top_n).unwrap_or(usize::MAX))
}
