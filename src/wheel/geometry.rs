use crate::models::Person;
use crate::wheel::rotation::segment_angle;

/// Wheel dimensions in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelLayout {
    pub size: f64,
    pub radius: f64,
    pub label_radius: f64,
}

impl Default for WheelLayout {
    fn default() -> Self {
        Self {
            size: 400.0,
            radius: 200.0,
            label_radius: 120.0,
        }
    }
}

impl WheelLayout {
    fn center(&self) -> f64 {
        self.size / 2.0
    }

    fn point(&self, radius: f64, deg: f64) -> (f64, f64) {
        let rad = deg.to_radians();
        let c = self.center();
        (c + radius * rad.cos(), c + radius * rad.sin())
    }
}

/// One drawable wedge of the wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub person_id: i64,
    pub label: String,
    pub start_angle: f64,
    pub end_angle: f64,
    /// SVG path data.
    pub path: String,
    pub label_x: f64,
    pub label_y: f64,
    /// Label rotation in degrees around (`label_x`, `label_y`).
    pub label_angle: f64,
    pub winner: bool,
    /// Odd wedges use the secondary color.
    pub alternate: bool,
}

/// Wedges for `eligible` in order, wedge 0 starting at angle 0.
/// Pass `winner` only once the wheel has stopped spinning.
pub fn wedges(eligible: &[Person], winner: Option<i64>, layout: &WheelLayout) -> Vec<Wedge> {
    if eligible.is_empty() {
        return Vec::new();
    }
    let seg = segment_angle(eligible.len());

    eligible
        .iter()
        .enumerate()
        .map(|(i, person)| {
            let start_angle = i as f64 * seg;
            let end_angle = start_angle + seg;
            let label_angle = start_angle + seg / 2.0;
            let (label_x, label_y) = layout.point(layout.label_radius, label_angle);
            Wedge {
                person_id: person.id,
                label: person.short_name().to_string(),
                start_angle,
                end_angle,
                path: wedge_path(layout, start_angle, end_angle),
                label_x,
                label_y,
                label_angle,
                winner: winner == Some(person.id),
                alternate: i % 2 == 1,
            }
        })
        .collect()
}

fn wedge_path(layout: &WheelLayout, start: f64, end: f64) -> String {
    let c = layout.center();
    let r = layout.radius;

    // 单人时 SVG 弧线无法首尾重合，画成两个半圆
    if end - start >= 360.0 {
        return format!(
            "M {:.2} {c:.2} A {r:.2} {r:.2} 0 1 1 {:.2} {c:.2} A {r:.2} {r:.2} 0 1 1 {:.2} {c:.2} Z",
            c - r,
            c + r,
            c - r,
        );
    }

    let large_arc = if end - start > 180.0 { 1 } else { 0 };
    let (x1, y1) = layout.point(r, start);
    let (x2, y2) = layout.point(r, end);
    format!(
        "M {c:.2} {c:.2} L {x1:.2} {y1:.2} A {r:.2} {r:.2} 0 {large_arc} 1 {x2:.2} {y2:.2} Z"
    )
}
