use crate::{
    formulation::time_dimension::TimeDimension,
    problem::{order::NodeIdx, time_window::Minutes},
};

/// Earliest arrival times along `walk`, starting at minute 0.
///
/// Waiting before a node is capped by the dimension slack. When a window
/// opens later than the cap allows, the whole prefix (depot departure
/// included) is pushed back as far as the prefix upper bounds permit.
/// Returns `None` when no schedule satisfies the hard bounds.
pub fn schedule_walk(time: &TimeDimension, walk: &[NodeIdx]) -> Option<Vec<Minutes>> {
    let mut arrivals: Vec<Minutes> = Vec::with_capacity(walk.len());

    for (position, &node) in walk.iter().enumerate() {
        let bounds = time.bounds(node);

        let Some(&previous_arrival) = arrivals.last() else {
            arrivals.push(bounds.min);
            continue;
        };

        let ready = previous_arrival + time.transit(walk[position - 1], node);
        let arrival = if ready >= bounds.min {
            ready
        } else {
            let shift = bounds.min - ready - time.max_slack();
            if shift > 0 {
                let room = walk[..position]
                    .iter()
                    .zip(&arrivals)
                    .map(|(&prior, &arrival)| time.bounds(prior).max - arrival)
                    .min()
                    .unwrap_or(0);

                if shift > room {
                    return None;
                }

                arrivals.iter_mut().for_each(|arrival| *arrival += shift);
            }

            bounds.min
        };

        if arrival > bounds.max {
            return None;
        }

        arrivals.push(arrival);
    }

    Some(arrivals)
}

#[cfg(test)]
mod tests {
    use crate::problem::{
        kilograms::Kilograms, location::Location, order::Order, time_window::TimeWindow,
        travel_matrices::TimeMatrix,
    };

    use super::*;

    fn dimension(windows: [TimeWindow; 2], allow_late: bool) -> TimeDimension {
        let here = Location::from_lat_lon(46.0, 14.5);
        let nodes = vec![
            Order::depot(),
            Order::new("a", Kilograms::new(1.0), here).with_window(windows[0]),
            Order::new("b", Kilograms::new(1.0), here).with_window(windows[1]),
        ];
        let transit = TimeMatrix::from_rows(vec![vec![0, 10, 20], vec![10, 0, 15], vec![20, 15, 0]]);

        TimeDimension::new(&nodes, transit, allow_late, 1)
    }

    fn walk(nodes: &[usize]) -> Vec<NodeIdx> {
        nodes.iter().copied().map(NodeIdx::new).collect()
    }

    #[test]
    fn test_unconstrained_walk_follows_transit() {
        let time = dimension([TimeWindow::NONE, TimeWindow::NONE], true);

        assert_eq!(
            schedule_walk(&time, &walk(&[0, 1, 2, 0])),
            Some(vec![0, 10, 25, 45])
        );
    }

    #[test]
    fn test_waits_within_slack() {
        let time = dimension([TimeWindow::new(Some(30), Some(60)), TimeWindow::NONE], false);

        // Ready at 10, waits 20 minutes
        assert_eq!(
            schedule_walk(&time, &walk(&[0, 1, 0])),
            Some(vec![0, 30, 40])
        );
    }

    #[test]
    fn test_late_opening_window_shifts_departure() {
        let time = dimension([TimeWindow::new(Some(480), Some(540)), TimeWindow::NONE], false);

        // Departs at 440, waits the full 30 minutes before the window opens
        assert_eq!(
            schedule_walk(&time, &walk(&[0, 1, 0])),
            Some(vec![440, 480, 490])
        );
    }

    #[test]
    fn test_hard_window_end_is_infeasible() {
        let windows = [TimeWindow::new(Some(480), Some(540)), TimeWindow::new(Some(0), Some(100))];

        let hard = dimension(windows, false);
        assert_eq!(schedule_walk(&hard, &walk(&[0, 1, 2, 0])), None);

        let soft = dimension(windows, true);
        assert_eq!(
            schedule_walk(&soft, &walk(&[0, 1, 2, 0])),
            Some(vec![440, 480, 495, 515])
        );
    }

    #[test]
    fn test_prefix_shift_is_bounded_by_earlier_windows() {
        // a closes at 20 and b opens at 100, too long a wait either way
        let time = dimension(
            [TimeWindow::new(Some(0), Some(20)), TimeWindow::new(Some(100), Some(200))],
            false,
        );

        assert_eq!(schedule_walk(&time, &walk(&[0, 1, 2, 0])), None);
        assert_eq!(
            schedule_walk(&time, &walk(&[0, 2, 1, 0])),
            None
        );
    }

    #[test]
    fn test_horizon_bounds_route_end() {
        let time = dimension([TimeWindow::new(Some(1430), Some(1435)), TimeWindow::NONE], true);

        // Back at the depot at 1440 at the earliest
        assert_eq!(
            schedule_walk(&time, &walk(&[0, 1, 0])),
            Some(vec![1390, 1430, 1440])
        );
        assert_eq!(schedule_walk(&time, &walk(&[0, 1, 2, 0])), None);
    }
}
