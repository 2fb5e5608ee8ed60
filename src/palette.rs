use crate::task::Task;
use ratatui::style::Color;

/// Badge tints for task cards.
pub const PALETTE: [Color; 7] = [
    Color::Rgb(187, 247, 208), // green
    Color::Rgb(191, 219, 254), // blue
    Color::Rgb(254, 240, 138), // yellow
    Color::Rgb(254, 202, 202), // red
    Color::Rgb(153, 246, 228), // teal
    Color::Rgb(233, 213, 255), // purple
    Color::Rgb(251, 207, 232), // pink
];

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME))
}

/// Same task, same color, on every render and across runs.
pub fn palette_color(task: &Task) -> Color {
    PALETTE[(fnv1a(task.key().as_bytes()) % PALETTE.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Task {
        Task {
            name: name.to_string(),
            ..Task::default()
        }
    }

    #[test]
    fn color_is_stable_per_task() {
        let task = named("Landing page");
        let first = palette_color(&task);
        for _ in 0..10 {
            assert_eq!(palette_color(&task), first);
        }
        assert_eq!(palette_color(&task.clone()), first);
    }

    #[test]
    fn colors_spread_over_palette() {
        let used: std::collections::HashSet<_> = (0..200)
            .map(|i| format!("{:?}", palette_color(&named(&format!("task {i}")))))
            .collect();
        assert!(used.len() > 3);
    }

    #[test]
    fn fnv_matches_reference_vectors() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }
}
