use shared_types::CalendarWindow;

/// Pairs of calendar windows that share at least one instant.
///
/// Endpoints are inclusive, so windows that touch overlap. Each pair is
/// reported once, earlier start first.
pub fn find_overlaps(windows: &[CalendarWindow]) -> Vec<(CalendarWindow, CalendarWindow)> {
    let mut sorted: Vec<&CalendarWindow> = windows.iter().collect();
    sorted.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

    let mut overlaps = Vec::new();
    for (i, current) in sorted.iter().enumerate() {
        // A window that ends before it starts still overlaps anything
        // starting at the same instant
        let reach = current.end.max(current.start);

        for next in sorted[i + 1..].iter().take_while(|next| next.start <= reach) {
            overlaps.push(((*current).clone(), (*next).clone()));
        }
    }

    overlaps
}

pub fn log_overlaps(overlaps: &[(CalendarWindow, CalendarWindow)]) {
    if overlaps.is_empty() {
        tracing::info!("No overlapping events");
        return;
    }

    for (first, second) in overlaps {
        tracing::info!(
            "Overlap: {} ({} - {}) and {} ({} - {})",
            first.summary.as_deref().unwrap_or(&first.id),
            first.start,
            first.end,
            second.summary.as_deref().unwrap_or(&second.id),
            second.start,
            second.end
        );
    }
}
