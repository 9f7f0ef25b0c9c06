use crate::detector::Prediction;
use common::detection::bounding_box::BoundingBox;
use common::utils::log_entry::model::ModelEntry;
use ndarray::{ArrayView1, ArrayView3, Axis};

fn softmax(logits: ArrayView1<f32>) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = logits.iter().map(|value| (value - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.into_iter().map(|value| value / sum).collect()
}

/// Decodes `(1, queries, classes + 1)` logits and `(1, queries, 4)` boxes.
/// The last class is "no object" and never reported.
pub fn decode(logits: ArrayView3<f32>, boxes: ArrayView3<f32>, image_width: u32, image_height: u32, threshold: f32) -> Result<Vec<Prediction>, ModelEntry> {
    let (logit_shape, box_shape) = (logits.shape(), boxes.shape());
    if logit_shape[0] == 0 || logit_shape[2] < 2 {
        return Err(ModelEntry::UnexpectedOutput(format!("logits shape {:?}", logit_shape)));
    }
    if box_shape[0] != logit_shape[0] || box_shape[1] != logit_shape[1] || box_shape[2] != 4 {
        return Err(ModelEntry::UnexpectedOutput(format!("boxes shape {:?} for logits shape {:?}", box_shape, logit_shape)));
    }

    let logits = logits.index_axis(Axis(0), 0);
    let boxes = boxes.index_axis(Axis(0), 0);
    let mut predictions = Vec::new();
    for (class_row, box_row) in logits.axis_iter(Axis(0)).zip(boxes.axis_iter(Axis(0))) {
        let probabilities = softmax(class_row);
        let (label, score) = probabilities[..probabilities.len() - 1]
            .iter()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |(best_label, best_score), (label, &score)| {
                if score > best_score { (label, score) } else { (best_label, best_score) }
            });
        if score > threshold {
            let bbox = BoundingBox::from_normalized_center(box_row[0], box_row[1], box_row[2], box_row[3], image_width, image_height);
            predictions.push(Prediction { label, score, bbox });
        }
    }
    Ok(predictions)
}
