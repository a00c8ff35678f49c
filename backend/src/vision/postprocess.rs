use plant_shared::DiseaseLabel;

use crate::error::PipelineError;

/// Index of the highest score. The first of several equal maxima wins and
/// NaN scores are never selected.
pub fn top_index(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Maps the score vector onto the label table by position.
pub fn select_label(scores: &[f32], labels: &[DiseaseLabel]) -> Result<DiseaseLabel, PipelineError> {
    if scores.len() != labels.len() {
        return Err(PipelineError::LabelMismatch {
            expected: labels.len(),
            actual: scores.len(),
        });
    }
    let index = top_index(scores)
        .ok_or_else(|| PipelineError::Inference("model produced no finite scores".into()))?;
    Ok(labels[index])
}
