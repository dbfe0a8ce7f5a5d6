//! Property checks for the sizing machinery and the forgiving text
//! formats, which must be exact at effectively arbitrary targets.

use proptest::prelude::*;

use genfile::application::ports::FileGenerator;
use genfile::engine::cost_model::CostModel;
use genfile::engine::planner::plan_unit_count;
use genfile::infrastructure::generators::text::{CsvGenerator, JsonGenerator, TextGenerator};
use genfile::parse_size;

proptest! {
    #[test]
    fn parsed_bare_numbers_are_identity(n in 0u64..u64::MAX / 2) {
        prop_assert_eq!(parse_size(&n.to_string()).unwrap(), n);
    }

    #[test]
    fn kilobyte_suffix_scales_by_1024(n in 0u64..1_000_000) {
        prop_assert_eq!(parse_size(&format!("{n}K")).unwrap(), n * 1024);
        prop_assert_eq!(parse_size(&format!("{n}kb")).unwrap(), n * 1024);
    }

    #[test]
    fn planner_never_overshoots(
        baseline in 10u64..500,
        marginal in 1u64..40,
        target in 0u64..100_000,
        min_block in 0u64..64,
    ) {
        let measure = |units: u64| Ok(baseline + units * marginal);
        let model = CostModel::probe(measure, 8).unwrap();
        if let Ok(plan) = plan_unit_count(target, &model, min_block, measure) {
            let actual = baseline + plan.units * marginal;
            prop_assert!(actual <= target);
            prop_assert_eq!(actual + plan.padding_needed, target);
            prop_assert!(
                plan.padding_needed == 0 || plan.padding_needed >= min_block
            );
        }
    }

    #[test]
    fn text_formats_are_exact_everywhere(target in 0u64..20_000) {
        let mut rng = rand::rng();
        let text = TextGenerator.generate(target, &mut rng).unwrap();
        prop_assert_eq!(text.len() as u64, target);
        let csv = CsvGenerator.generate(target, &mut rng).unwrap();
        prop_assert_eq!(csv.len() as u64, target);
        let json = JsonGenerator.generate(target, &mut rng).unwrap();
        prop_assert_eq!(json.len() as u64, target);
    }

    #[test]
    fn json_stays_structurally_closed(target in 2u64..5_000) {
        let mut rng = rand::rng();
        let bytes = JsonGenerator.generate(target, &mut rng).unwrap();
        prop_assert_eq!(bytes.first(), Some(&b'{'));
        prop_assert_eq!(bytes.last(), Some(&b'}'));
    }
}
