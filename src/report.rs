use crate::format::Header;
use crate::parsing::Dataset;
use json::JsonValue;
use ndarray::ArrayView1;
use std::path::Path;

/// The line printed once a conversion has been written
pub fn confirmation(header: &Header, path: &Path) -> String {
    format!("Saved {} samples to {}", header.num_samples, path.display())
}

/// Character for a normalized intensity, darkest last
fn shade(pixel: f32) -> char {
    match pixel {
        p if p < 0.1 => ' ',
        p if p < 0.3 => '.',
        p if p < 0.5 => ':',
        p if p < 0.7 => '+',
        p if p < 0.9 => '*',
        _ => '#',
    }
}

/// Render an image as framed ASCII art, `width` pixels per row.
/// A short last row is padded with blanks
pub fn render_ascii(image: &ArrayView1<f32>, label: Option<u8>, width: usize) -> String {
    let width = width.max(1);
    let height = image.len().div_ceil(width);
    let mut out = String::new();

    if let Some(label) = label {
        out.push_str(&format!("Label: {}\n", label));
    }

    out.push_str(&format!("┌{}┐\n", "─".repeat(width)));
    for y in 0..height {
        out.push('│');
        for x in 0..width {
            out.push(image.get(y * width + x).map_or(' ', |&p| shade(p)));
        }
        out.push_str("│\n");
    }
    out.push_str(&format!("└{}┘\n", "─".repeat(width)));

    out
}

/// Row width for previews: the side of a square image, or the whole row otherwise
pub fn preview_width(num_features: usize) -> usize {
    let side = (num_features as f64).sqrt().round() as usize;

    if side * side == num_features {
        side
    } else {
        num_features
    }
}

/// Counts and the label histogram as JSON.
/// Only labels that occur are listed, keyed by their value
pub fn summary_json(dataset: &Dataset) -> JsonValue {
    let mut data = JsonValue::new_object();
    let mut counts = JsonValue::new_object();

    for (label, &count) in dataset.label_counts().iter().enumerate() {
        if count > 0 {
            counts[label.to_string()] = count.into();
        }
    }

    data["num_samples"] = dataset.num_samples().into();
    data["num_features"] = dataset.num_features().into();
    data["label_counts"] = counts;

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn confirmation_names_count_and_path() {
        let line = confirmation(&Header::new(2, 3), Path::new("data/mnist.bin"));

        assert_eq!(line, "Saved 2 samples to data/mnist.bin");
    }

    #[test]
    fn renders_framed_rows() {
        let image = array![0.0f32, 0.2, 0.4, 0.6, 0.8, 1.0];
        let art = render_ascii(&image.view(), Some(5), 3);

        assert_eq!(art, "Label: 5\n┌───┐\n│ .:│\n│+*#│\n└───┘\n");
    }

    #[test]
    fn pads_short_last_row() {
        let image = array![1.0f32, 1.0, 1.0];
        let art = render_ascii(&image.view(), None, 2);

        assert_eq!(art, "┌──┐\n│##│\n│# │\n└──┘\n");
    }

    #[test]
    fn preview_width_prefers_squares() {
        assert_eq!(preview_width(784), 28);
        assert_eq!(preview_width(6), 6);
        assert_eq!(preview_width(0), 0);
    }

    #[test]
    fn summary_lists_present_labels() {
        let dataset = Dataset::new(
            ndarray::Array2::zeros((3, 2)),
            array![1u8, 1, 4],
        )
        .unwrap();
        let summary = summary_json(&dataset);

        assert_eq!(summary["num_samples"].as_usize(), Some(3));
        assert_eq!(summary["num_features"].as_usize(), Some(2));
        assert_eq!(summary["label_counts"]["1"].as_usize(), Some(2));
        assert_eq!(summary["label_counts"]["4"].as_usize(), Some(1));
        assert!(summary["label_counts"]["0"].is_null());
    }
}
