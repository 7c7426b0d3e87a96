//! Choropleth shading shared by the state and county views.

/// Lower bounds (exclusive) paired with the shade used above them, darkest first.
const BINS: [(f64, &str); 7] = [
    (16.0, "#3A1C71"),
    (14.0, "#4B36D1"),
    (12.0, "#5560E9"),
    (10.0, "#5E8BEF"),
    (8.0, "#66B3F3"),
    (6.0, "#72D8F7"),
    (4.0, "#7FFFD4"),
];

const LOWEST: &str = "#E0FFFF";

pub const GRADES: [u32; 8] = [0, 4, 6, 8, 10, 12, 14, 16];

pub fn color_for(value: f64) -> &'static str {
    BINS.iter()
        .find(|(bound, _)| value > *bound)
        .map(|(_, color)| *color)
        .unwrap_or(LOWEST)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: &'static str,
}

pub fn entries() -> Vec<LegendEntry> {
    GRADES
        .iter()
        .enumerate()
        .map(|(i, &from)| {
            let label = match GRADES.get(i + 1) {
                Some(to) => format!("{}–{}%", from, to),
                None => format!("{}+%", from),
            };
            LegendEntry {
                label,
                color: color_for(f64::from(from + 1)),
            }
        })
        .collect()
}
