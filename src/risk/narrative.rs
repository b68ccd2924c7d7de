use super::types::FeatureSet;

/// Clause groups, in the order their sentences appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleGroup {
    Texture,
    Slope,
    Rain,
}

impl RuleGroup {
    pub const ALL: [RuleGroup; 3] = [RuleGroup::Texture, RuleGroup::Slope, RuleGroup::Rain];
}

/// One predicate/sentence pair of the narrative.
pub struct Clause {
    pub group: RuleGroup,
    pub name: &'static str,
    applies: fn(&FeatureSet) -> bool,
    render: fn(&FeatureSet) -> String,
}

impl Clause {
    pub fn applies(&self, features: &FeatureSet) -> bool {
        (self.applies)(features)
    }

    pub fn render(&self, features: &FeatureSet) -> String {
        (self.render)(features)
    }
}

impl std::fmt::Debug for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clause")
            .field("group", &self.group)
            .field("name", &self.name)
            .finish()
    }
}

/// Every clause in evaluation order. Within a group the first match wins.
pub const CLAUSES: &[Clause] = &[
    Clause {
        group: RuleGroup::Texture,
        name: "clay-rich",
        applies: |f| f.clay / 100.0 > 0.45,
        render: |f| {
            format!(
                "Clay-rich soil ({:.0}% clay) is cohesive but turns slippery once wet.",
                f.clay.round()
            )
        },
    },
    Clause {
        group: RuleGroup::Texture,
        name: "sandy",
        applies: |f| f.sand / 100.0 > 0.6,
        render: |f| {
            format!(
                "Sandy soil ({:.0}% sand) holds little cohesion and is prone to washout.",
                f.sand.round()
            )
        },
    },
    Clause {
        group: RuleGroup::Texture,
        name: "balanced",
        applies: |_| true,
        render: |_| "A balanced clay, silt and sand mix gives moderate natural stability.".to_string(),
    },
    Clause {
        group: RuleGroup::Slope,
        name: "extremely-steep",
        applies: |f| f.slope > 35.0,
        render: |f| format!("The terrain is extremely steep ({}°), which strongly favors failure.", f.slope),
    },
    Clause {
        group: RuleGroup::Slope,
        name: "flat",
        applies: |f| f.slope < 5.0,
        render: |f| format!("The ground is nearly flat ({}°), which reduces risk.", f.slope),
    },
    Clause {
        group: RuleGroup::Rain,
        name: "critical-saturation",
        applies: |f| f.rain > 400.0,
        render: |_| "Heavy rainfall is pushing the soil toward critical saturation.".to_string(),
    },
    Clause {
        group: RuleGroup::Rain,
        name: "moderate-rain",
        applies: |f| f.rain > 100.0,
        render: |_| "Moderate rainfall is adding pore-water pressure to the slope.".to_string(),
    },
];

/// Clauses that fire for `features`, grouped texture -> slope -> rain.
pub fn fired_clauses(features: &FeatureSet) -> Vec<&'static Clause> {
    RuleGroup::ALL
        .iter()
        .filter_map(|group| {
            CLAUSES
                .iter()
                .find(|clause| clause.group == *group && clause.applies(features))
        })
        .collect()
}

/// Render the fired clauses as one space-separated paragraph.
pub fn compose(features: &FeatureSet) -> String {
    fired_clauses(features)
        .iter()
        .map(|clause| clause.render(features))
        .collect::<Vec<_>>()
        .join(" ")
}
