// Built-in political dimensions, used when no definitions file is configured.
//
// Five common lines of political conflict. Each pole lists the vocabulary
// that tends to be used by one side of that conflict.

use super::definition::AxisDefinition;

pub fn political_dimensions() -> Vec<AxisDefinition> {
    vec![
        AxisDefinition::new(
            "economic",
            [
                "socialism", "welfare", "equality", "redistribution", "taxes", "healthcare",
                "universal", "subsidies", "cooperative",
            ],
            [
                "capitalism", "deregulation", "privatization", "markets", "taxcuts", "insurance",
                "monopoly", "inequity", "exploitation",
            ],
        ),
        AxisDefinition::new(
            "social",
            [
                "equality", "rights", "feminism", "queer", "diversity", "reform", "inclusion",
                "justice", "empowerment", "tolerance",
            ],
            [
                "tradition", "patriotism", "nationalism", "family", "heritage", "order",
                "conservatism", "segregation", "exclusion", "inequality",
            ],
        ),
        AxisDefinition::new(
            "environment",
            [
                "climate", "renewable", "conservation", "sustainable", "green", "ecology",
                "biophilia", "restoration", "permaculture", "biodiversity",
            ],
            [
                "coal", "drilling", "deregulation", "growth", "nuclear", "oil", "deforestation",
                "pollution", "extinction", "waste",
            ],
        ),
        AxisDefinition::new(
            "foreign",
            [
                "cooperation", "rights", "globalization", "NATO", "trade", "peace", "diplomacy",
                "multilateralism", "aid", "openness",
            ],
            [
                "sovereignty", "borders", "tariffs", "nationalism", "security", "immigration",
                "isolationism", "protectionism", "conflict", "xenophobia",
            ],
        ),
        AxisDefinition::new(
            "governance",
            [
                "democracy", "transparency", "liberty", "rights", "press", "justice",
                "accountability", "participation", "equality", "rule of law",
            ],
            [
                "power", "surveillance", "control", "censorship", "state", "security",
                "corruption", "authoritarianism", "inequality", "impunity",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_dimensions_are_well_formed() {
        let dims = political_dimensions();
        assert_eq!(dims.len(), 5);
        assert_eq!(dims[0].name, "economic");
        for dim in &dims {
            assert!(!dim.left.is_empty(), "{} has an empty left pole", dim.name);
            assert!(!dim.right.is_empty(), "{} has an empty right pole", dim.name);
        }
    }
}
