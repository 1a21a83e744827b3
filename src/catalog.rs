//! Built-in routine templates and the lifts tracked on the strength chart.

/// A named routine and its exercises in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routine {
    pub name: &'static str,
    pub exercises: &'static [&'static str],
}

pub const ROUTINES: &[Routine] = &[
    Routine {
        name: "A – Push",
        exercises: &[
            "Incline Machine Press",
            "Flat DB Press",
            "Shoulder Press",
            "Lateral Raises",
            "Triceps Pushdown",
        ],
    },
    Routine {
        name: "B – Pull",
        exercises: &[
            "Deadlift / RDL",
            "Lat Pulldown",
            "Chest Supported Row",
            "Face Pull",
            "Barbell Curl",
        ],
    },
    Routine {
        name: "C – Legs",
        exercises: &["Squat", "Leg Press", "Hamstring Curl", "Calf Raises", "Plank"],
    },
    Routine {
        name: "Abs Day 1",
        exercises: &["Ab Wheel Rollouts", "Reverse Crunch", "Leg Raises", "Plank"],
    },
    Routine {
        name: "Abs Day 2",
        exercises: &["Ab Wheel Rollouts", "Dead Bug", "Side Plank", "Hollow Hold"],
    },
];

/// Compound lifts plotted on the strength trend
pub const TRACKED_LIFTS: &[&str] = &["Incline Machine Press", "Deadlift / RDL", "Squat"];

/// Look up a routine by exact name
pub fn routine(name: &str) -> Option<&'static Routine> {
    ROUTINES.iter().find(|r| r.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routine_lookup() {
        let legs = routine("C – Legs").unwrap();
        assert_eq!(legs.exercises[0], "Squat");
        assert!(routine("D – Arms").is_none());
    }

    #[test]
    fn test_tracked_lifts_belong_to_a_routine() {
        for lift in TRACKED_LIFTS {
            assert!(ROUTINES.iter().any(|r| r.exercises.contains(lift)));
        }
    }
}
