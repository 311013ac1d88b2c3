use approx::relative_eq;
use pareto_report::ranker::rank;
use pareto_report::types::SupplierRecord;
use proptest::prelude::*;

fn records() -> impl Strategy<Value = Vec<SupplierRecord>> {
    prop::collection::vec((0u32..50, 0u32..1000), 1..40).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (nc, delivered))| SupplierRecord {
                supplier_name: format!("S{i}"),
                nonconforming_count: f64::from(nc),
                delivered_count: f64::from(delivered),
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn shares_sum_to_hundred(input in records()) {
        prop_assume!(input.iter().any(|r| r.nonconforming_count > 0.0));
        let table = rank(&input).unwrap();
        let sum: f64 = table.individual_shares().iter().sum();
        prop_assert!(relative_eq!(sum, 100.0, epsilon = 1e-6), "sum = {}", sum);
        let last = *table.cumulative_shares().last().unwrap();
        prop_assert!(relative_eq!(last, 100.0, epsilon = 1e-6), "last = {}", last);
    }

    #[test]
    fn sorted_descending_with_stable_ties(input in records()) {
        prop_assume!(input.iter().any(|r| r.nonconforming_count > 0.0));
        let table = rank(&input).unwrap();
        let entries = table.entries();
        prop_assert_eq!(entries.len(), input.len());
        let position = |name: &str| input.iter().position(|r| r.supplier_name == name).unwrap();
        for pair in entries.windows(2) {
            prop_assert!(pair[0].nonconforming_count >= pair[1].nonconforming_count);
            if pair[0].nonconforming_count == pair[1].nonconforming_count {
                prop_assert!(position(&pair[0].supplier_name) < position(&pair[1].supplier_name));
            }
        }
    }

    #[test]
    fn cumulative_share_is_monotonic(input in records()) {
        prop_assume!(input.iter().any(|r| r.nonconforming_count > 0.0));
        let cumulative = rank(&input).unwrap().cumulative_shares();
        for pair in cumulative.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn rank_is_idempotent(input in records()) {
        prop_assume!(input.iter().any(|r| r.nonconforming_count > 0.0));
        prop_assert_eq!(rank(&input).unwrap(), rank(&input).unwrap());
    }
}
