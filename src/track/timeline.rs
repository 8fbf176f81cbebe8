//! Loop timeline construction.
//!
//! Every measurable item gets two linear segments. The *exit* segment drifts
//! it left until its right edge reaches the track start. The *wrap* segment
//! re-enters it one full loop width further right and drifts it back to
//! where it started. Both segments move at the same pixels-per-second rate,
//! so each item's cycle lasts exactly `total_width / pps` seconds and the
//! strip reads as one continuous band.

use super::measure::{ElementMetrics, Snap};
use crate::config::LoopSettings;
use crate::gfx::anim::lerp;
use log::debug;

/// A linear move of an item's pixel translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub duration: f64,
    pub from: f64,
    pub to: f64,
}

impl Segment {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn distance(&self) -> f64 {
        (self.from - self.to).abs()
    }

    pub fn sample(&self, time: f64) -> f64 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = ((time - self.start) / self.duration).clamp(0.0, 1.0);
        lerp(self.from, self.to, t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub distance_to_start: f64,
    pub distance_to_loop: f64,
    pub exit: Segment,
    pub wrap: Segment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackElement {
    pub index: usize,
    pub width: f64,
    pub offset_left: f64,
    /// Translation the item rests at, in pixels.
    pub rest_px: f64,
    /// The same translation as a percentage of `width`.
    pub rest_x_percent: f64,
    /// `None` for items that are painted but not looped.
    pub motion: Option<Motion>,
}

impl TrackElement {
    pub fn x_percent_at(&self, time: f64, snap: Snap) -> f64 {
        let Some(motion) = &self.motion else {
            return self.rest_x_percent;
        };
        let px = if time < motion.exit.end() {
            motion.exit.sample(time)
        } else {
            motion.wrap.sample(time)
        };
        snap.apply(px) / self.width * 100.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopTimeline {
    elements: Vec<TrackElement>,
    total_width: f64,
    pixels_per_second: f64,
    times: Vec<f64>,
    duration: f64,
    snap: Snap,
}

impl LoopTimeline {
    pub fn build(metrics: &[ElementMetrics], settings: &LoopSettings) -> Self {
        let snap = Snap::from_grid(settings.snap);
        let pps = settings.pixels_per_second();
        let pps_ok = pps.is_finite() && pps > 0.0;

        let Some(first) = metrics.first() else {
            debug!("loop timeline: no items, nothing to animate");
            return Self::empty(snap, pps);
        };
        let start_x = if first.offset_left.is_finite() {
            first.offset_left
        } else {
            0.0
        };

        let mut elements: Vec<TrackElement> = metrics
            .iter()
            .enumerate()
            .map(|(index, m)| {
                let (rest_px, rest_x_percent) = if m.is_measurable() {
                    let px = snap.apply(m.x + m.x_percent / 100.0 * m.width);
                    (px, px / m.width * 100.0)
                } else {
                    (finite_or_zero(m.x), finite_or_zero(m.x_percent))
                };
                TrackElement {
                    index,
                    width: m.width,
                    offset_left: m.offset_left,
                    rest_px,
                    rest_x_percent,
                    motion: None,
                }
            })
            .collect();

        let measurable = metrics.iter().filter(|m| m.is_measurable()).count();
        let total_width = metrics
            .iter()
            .rposition(ElementMetrics::is_measurable)
            .map(|last| {
                let m = &metrics[last];
                m.offset_left + elements[last].rest_px - start_x
                    + m.rendered_width()
                    + finite_or_zero(settings.padding_right)
            })
            .unwrap_or(0.0);

        let times: Vec<f64> = elements
            .iter()
            .map(|el| {
                if pps_ok && el.offset_left.is_finite() {
                    (el.offset_left + el.rest_px - start_x) / pps
                } else {
                    0.0
                }
            })
            .collect();

        let animated = measurable >= 2 && pps_ok && total_width.is_finite() && total_width > 0.0;
        if !animated {
            debug!(
                "loop timeline: static track ({} items, {} measurable, width {:.1}, {:.1}px/s)",
                metrics.len(),
                measurable,
                total_width,
                pps
            );
            return Self {
                elements,
                total_width,
                pixels_per_second: pps,
                times,
                duration: 0.0,
                snap,
            };
        }

        for (el, m) in elements.iter_mut().zip(metrics) {
            if !m.is_measurable() {
                continue;
            }
            let distance_to_start = el.offset_left + el.rest_px - start_x;
            let distance_to_loop = distance_to_start + m.rendered_width();
            let exit = Segment {
                start: 0.0,
                duration: distance_to_loop / pps,
                from: el.rest_px,
                to: snap.apply(el.rest_px - distance_to_loop),
            };
            let wrap = Segment {
                start: exit.end(),
                duration: (total_width - distance_to_loop).max(0.0) / pps,
                from: snap.apply(el.rest_px - distance_to_loop + total_width),
                to: el.rest_px,
            };
            el.motion = Some(Motion {
                distance_to_start,
                distance_to_loop,
                exit,
                wrap,
            });
        }

        Self {
            elements,
            total_width,
            pixels_per_second: pps,
            times,
            duration: total_width / pps,
            snap,
        }
    }

    fn empty(snap: Snap, pps: f64) -> Self {
        Self {
            elements: Vec::new(),
            total_width: 0.0,
            pixels_per_second: pps,
            times: Vec::new(),
            duration: 0.0,
            snap,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// True when nothing moves: no items, fewer than two measurable ones, or no speed.
    pub fn is_static(&self) -> bool {
        self.duration <= 0.0
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn total_width(&self) -> f64 {
        self.total_width
    }

    pub fn pixels_per_second(&self) -> f64 {
        self.pixels_per_second
    }

    /// Time at which each item reaches the track start.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn elements(&self) -> &[TrackElement] {
        &self.elements
    }

    /// Wraps any play-head time into `[0, duration)`.
    pub fn local_time(&self, time: f64) -> f64 {
        if self.is_static() || !time.is_finite() {
            0.0
        } else {
            time.rem_euclid(self.duration)
        }
    }

    pub fn x_percent_at(&self, index: usize, time: f64) -> Option<f64> {
        let local = self.local_time(time);
        self.elements
            .get(index)
            .map(|el| el.x_percent_at(local, self.snap))
    }

    /// Reports every item's transform at play-head `time`.
    pub fn sample(&self, time: f64, mut write: impl FnMut(usize, f64)) {
        let local = self.local_time(time);
        for el in &self.elements {
            write(el.index, el.x_percent_at(local, self.snap));
        }
    }

    /// Reports every item's resting transform.
    pub fn rest(&self, mut write: impl FnMut(usize, f64)) {
        for el in &self.elements {
            write(el.index, el.rest_x_percent);
        }
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(count: usize, width: f64, gap: f64) -> Vec<ElementMetrics> {
        (0..count)
            .map(|i| ElementMetrics::new(i as f64 * (width + gap), width))
            .collect()
    }

    fn settings(speed: f64, padding_right: f64) -> LoopSettings {
        LoopSettings {
            speed,
            padding_right,
            ..LoopSettings::default()
        }
    }

    #[test]
    fn five_items_make_a_six_second_loop() {
        let tl = LoopTimeline::build(&row(5, 100.0, 20.0), &settings(1.0, 20.0));
        assert_eq!(tl.total_width(), 600.0);
        assert_eq!(tl.duration(), 6.0);

        let first = tl.elements()[0].motion.unwrap();
        assert_eq!(first.distance_to_loop, 100.0);
        assert_eq!(first.exit.duration, 1.0);
        assert_eq!(first.exit.duration + first.wrap.duration, 6.0);
        assert_eq!(first.wrap.end(), 6.0);
    }

    #[test]
    fn spans_add_up_to_the_loop_width() {
        for count in 2..8 {
            for gap in [0.0, 7.0, 20.0] {
                let metrics = row(count, 100.0, gap);
                let tl = LoopTimeline::build(&metrics, &settings(1.3, gap));
                let spans: f64 = metrics.iter().map(|m| m.width + gap).sum();
                assert!((spans - tl.total_width()).abs() < 1e-9, "n={count} gap={gap}");

                for el in tl.elements() {
                    let m = el.motion.unwrap();
                    let travelled = m.exit.distance() + m.wrap.distance();
                    assert!(
                        (travelled - tl.total_width()).abs() < 1e-9,
                        "item {} travels {travelled}",
                        el.index
                    );
                    assert!((m.wrap.end() - tl.duration()).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn index_times_follow_distance_to_start() {
        let tl = LoopTimeline::build(&row(5, 100.0, 20.0), &settings(1.0, 20.0));
        let expected = [0.0, 1.2, 2.4, 3.6, 4.8];
        for (got, want) in tl.times().iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
    }

    #[test]
    fn wrap_reenters_one_loop_width_to_the_right() {
        let tl = LoopTimeline::build(&row(4, 50.0, 10.0), &settings(1.0, 10.0));
        for el in tl.elements() {
            let m = el.motion.unwrap();
            assert_eq!(m.exit.to + tl.total_width(), m.wrap.from);
            assert_eq!(m.exit.from, m.wrap.to);
        }
    }

    #[test]
    fn loop_start_and_end_show_the_same_frame() {
        let tl = LoopTimeline::build(&row(3, 80.0, 16.0), &settings(0.7, 16.0));
        for i in 0..tl.len() {
            let start = tl.x_percent_at(i, 0.0).unwrap();
            let end = tl.x_percent_at(i, tl.duration() - 1e-9).unwrap();
            assert!((start - end).abs() <= 100.0 / 80.0, "item {i}: {start} vs {end}");
        }
    }

    #[test]
    fn sampling_moves_left_at_constant_speed() {
        let tl = LoopTimeline::build(&row(5, 100.0, 20.0), &settings(1.0, 20.0));
        // Item 2 rests at 0 and drifts 100px per second.
        assert_eq!(tl.x_percent_at(2, 0.0), Some(0.0));
        assert_eq!(tl.x_percent_at(2, 1.0), Some(-100.0));
        assert_eq!(tl.x_percent_at(2, 1.5), Some(-150.0));
        // Second loop looks like the first.
        assert_eq!(tl.x_percent_at(2, 7.5), Some(-150.0));
    }

    #[test]
    fn existing_transform_is_folded_into_rest() {
        let mut metrics = row(2, 100.0, 0.0);
        metrics[1].x = 10.0;
        metrics[1].x_percent = 50.0;
        let tl = LoopTimeline::build(&metrics, &settings(1.0, 0.0));
        let el = &tl.elements()[1];
        assert_eq!(el.rest_px, 60.0);
        assert_eq!(el.rest_x_percent, 60.0);
        assert_eq!(tl.total_width(), 100.0 + 60.0 + 100.0);
    }

    #[test]
    fn snapping_keeps_endpoints_on_the_grid() {
        let metrics = vec![
            ElementMetrics::new(0.0, 33.3),
            ElementMetrics::new(41.7, 33.3),
            ElementMetrics::new(83.4, 33.3),
        ];
        let tl = LoopTimeline::build(&metrics, &settings(1.0, 8.4));
        for el in tl.elements() {
            let m = el.motion.unwrap();
            assert_eq!(m.exit.to, m.exit.to.round());
            assert_eq!(m.wrap.from, m.wrap.from.round());
        }

        let off = LoopSettings {
            snap: 0.0,
            ..settings(1.0, 8.4)
        };
        let tl = LoopTimeline::build(&metrics, &off);
        let m = tl.elements()[1].motion.unwrap();
        assert!((m.exit.to - -75.0).abs() < 1e-9);
    }

    #[test]
    fn empty_list_is_a_no_op() {
        let tl = LoopTimeline::build(&[], &LoopSettings::default());
        assert!(tl.is_empty());
        assert!(tl.is_static());
        let mut writes = 0;
        tl.sample(3.0, |_, _| writes += 1);
        assert_eq!(writes, 0);
    }

    #[test]
    fn single_item_is_static() {
        let tl = LoopTimeline::build(&row(1, 100.0, 0.0), &settings(1.0, 20.0));
        assert!(tl.is_static());
        assert_eq!(tl.duration(), 0.0);
        assert!(tl.elements()[0].motion.is_none());
        assert_eq!(tl.x_percent_at(0, 12.0), Some(0.0));
        assert_eq!(tl.local_time(12.0), 0.0);
    }

    #[test]
    fn zero_speed_is_static() {
        let tl = LoopTimeline::build(&row(3, 100.0, 0.0), &settings(0.0, 0.0));
        assert!(tl.is_static());
        assert!(tl.times().iter().all(|t| *t == 0.0));
    }

    #[test]
    fn zero_width_items_are_painted_but_not_looped() {
        let metrics = vec![
            ElementMetrics::new(0.0, 100.0),
            ElementMetrics::new(100.0, 0.0),
            ElementMetrics::new(100.0, 100.0),
        ];
        let tl = LoopTimeline::build(&metrics, &settings(1.0, 0.0));
        assert_eq!(tl.total_width(), 200.0);
        assert!(tl.elements()[1].motion.is_none());
        assert!(tl.elements()[2].motion.is_some());

        let mut seen = Vec::new();
        tl.sample(0.5, |i, x| seen.push((i, x)));
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1], (1, 0.0));
    }

    #[test]
    fn trailing_zero_width_item_does_not_stretch_the_loop() {
        let mut metrics = row(2, 100.0, 0.0);
        metrics.push(ElementMetrics::new(500.0, 0.0));
        let tl = LoopTimeline::build(&metrics, &settings(1.0, 0.0));
        assert_eq!(tl.total_width(), 200.0);
    }
}
