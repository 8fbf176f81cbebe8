//! Shortest-path navigation between track items.
//!
//! Items reach the track start at increasing play-head times, so "later
//! item" means "later time". The route is worked out on the circle of
//! play-head time rather than by patching a linear time difference. The
//! forward distance to the target is `(t - p) mod D` and the backward
//! distance is `D` minus that. The requested direction (from the index
//! delta) picks a side, and the other side is used only when the requested
//! one is longer than half a loop. The play-head therefore moves
//! monotonically and never travels more than `D / 2`.

use log::debug;

/// A resolved jump: which item, how many steps, and how far the play-head moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub from: usize,
    pub to: usize,
    /// Signed index steps, within `[-len/2, len/2]`. An even split keeps the
    /// requested direction.
    pub steps: isize,
    /// Signed play-head movement in seconds, within `[-D/2, D/2]`.
    pub delta_time: f64,
}

impl Route {
    pub fn stay(index: usize) -> Self {
        Self {
            from: index,
            to: index,
            steps: 0,
            delta_time: 0.0,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.steps == 0 || self.delta_time == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Navigator {
    len: usize,
    current: usize,
}

impl Navigator {
    pub fn new(len: usize) -> Self {
        Self { len, current: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Changes the item count, keeping the current index in range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.current = 0;
        } else {
            self.current %= len;
        }
    }

    /// Makes `index` (wrapped) the current item.
    pub fn commit(&mut self, index: usize) {
        if self.len > 0 {
            self.current = index % self.len;
        }
    }

    /// Works out how to reach `target` from `from`, given the per-item times,
    /// the current play-head and the loop duration.
    pub fn resolve_from(
        &self,
        from: usize,
        target: isize,
        times: &[f64],
        playhead: f64,
        duration: f64,
    ) -> Route {
        let n = self.len.min(times.len());
        if n == 0 {
            return Route::stay(from);
        }
        let n = n as isize;
        let from = from % n as usize;

        let requested = target - from as isize;
        let mut steps = requested.rem_euclid(n);
        if 2 * steps > n || (2 * steps == n && requested < 0) {
            steps -= n;
        }
        let to = (from as isize + steps).rem_euclid(n) as usize;
        if steps == 0 {
            return Route::stay(from);
        }
        if !(duration > 0.0) || !playhead.is_finite() {
            // Nothing to animate, but the index still moves.
            return Route {
                from,
                to,
                steps,
                delta_time: 0.0,
            };
        }

        let forward = (times[to] - playhead).rem_euclid(duration);
        let backward = forward - duration;
        let half = duration / 2.0;
        let delta_time = if forward == 0.0 {
            0.0
        } else if steps > 0 {
            if forward <= half {
                forward
            } else {
                backward
            }
        } else if -backward <= half {
            backward
        } else {
            forward
        };

        debug!(
            "route {} -> {} ({:+} steps, {:+.3}s of {:.3}s)",
            from, to, steps, delta_time, duration
        );
        Route {
            from,
            to,
            steps,
            delta_time,
        }
    }

    pub fn resolve(&self, target: isize, times: &[f64], playhead: f64, duration: f64) -> Route {
        self.resolve_from(self.current, target, times, playhead, duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMES: [f64; 5] = [0.0, 1.2, 2.4, 3.6, 4.8];
    const DURATION: f64 = 6.0;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn jumping_to_current_is_a_no_op() {
        let nav = Navigator::new(5);
        for playhead in [0.0, 0.7, 3.0, 5.99] {
            let route = nav.resolve(0, &TIMES, playhead, DURATION);
            assert!(route.is_noop());
            assert_eq!(route.delta_time, 0.0);
            assert_eq!(route.to, 0);
        }
    }

    #[test]
    fn next_and_previous_wrap_the_short_way() {
        let mut nav = Navigator::new(5);
        let next = nav.resolve(1, &TIMES, 0.0, DURATION);
        assert_eq!((next.to, next.steps), (1, 1));
        assert!(close(next.delta_time, 1.2));

        let prev = nav.resolve(-1, &TIMES, 0.0, DURATION);
        assert_eq!((prev.to, prev.steps), (4, -1));
        assert!(close(prev.delta_time, -1.2));

        nav.commit(4);
        let wrap = nav.resolve(5, &TIMES, 4.8, DURATION);
        assert_eq!((wrap.to, wrap.steps), (0, 1));
        assert!(close(wrap.delta_time, 1.2), "crosses the loop seam forwards");
    }

    #[test]
    fn far_targets_go_round_the_other_way() {
        let nav = Navigator::new(5);
        let route = nav.resolve(3, &TIMES, 0.0, DURATION);
        assert_eq!(route.steps, -2);
        assert_eq!(route.to, 3);
        assert!(close(route.delta_time, -2.4));
    }

    #[test]
    fn even_split_keeps_the_requested_direction() {
        let mut nav = Navigator::new(4);
        let times = [0.0, 1.5, 3.0, 4.5];
        let route = nav.resolve(2, &times, 0.0, 6.0);
        assert_eq!(route.steps, 2);
        assert!(close(route.delta_time, 3.0));

        nav.commit(2);
        let route = nav.resolve(0, &times, 3.0, 6.0);
        assert_eq!((route.to, route.steps), (0, -2));
        assert!(close(route.delta_time, -3.0));
    }

    #[test]
    fn never_travels_more_than_half_a_loop() {
        let mut nav = Navigator::new(5);
        let mut playhead = 0.0;
        while playhead < DURATION {
            for current in 0..5 {
                nav.commit(current);
                for target in -7..12 {
                    let route = nav.resolve(target, &TIMES, playhead, DURATION);
                    assert!(
                        route.delta_time.abs() <= DURATION / 2.0 + 1e-9,
                        "{current} -> {target} at {playhead}: {}",
                        route.delta_time
                    );
                    let landed = (playhead + route.delta_time).rem_euclid(DURATION);
                    if !route.is_noop() {
                        assert!(
                            close(landed, TIMES[route.to]) || close(landed, DURATION),
                            "lands on item {}",
                            route.to
                        );
                    }
                }
            }
            playhead += 0.35;
        }
    }

    #[test]
    fn drifted_playhead_keeps_the_requested_direction() {
        let nav = Navigator::new(5);
        // Play-head drifted past item 1 already; going forward to 2 is still short.
        let route = nav.resolve(2, &TIMES, 1.9, DURATION);
        assert!(close(route.delta_time, 0.5));
        // Going back to 4 from just after 0 crosses the seam backwards.
        let route = nav.resolve(-1, &TIMES, 0.3, DURATION);
        assert_eq!(route.to, 4);
        assert!(close(route.delta_time, -1.5));
    }

    #[test]
    fn empty_or_static_tracks_stay_put() {
        let nav = Navigator::new(0);
        assert!(nav.resolve(3, &[], 0.0, 6.0).is_noop());
        let nav = Navigator::new(3);
        let route = nav.resolve(2, &[0.0, 0.0, 0.0], 0.0, 0.0);
        assert!(route.is_noop());
        assert_eq!((route.to, route.steps), (2, -1));
    }

    #[test]
    fn set_len_keeps_index_in_range() {
        let mut nav = Navigator::new(5);
        nav.commit(4);
        nav.set_len(3);
        assert_eq!(nav.current(), 1);
        nav.set_len(0);
        assert_eq!(nav.current(), 0);
        nav.commit(7);
        assert_eq!(nav.current(), 0);
    }
}
