use abect_calculator::{Calculator, Catalog, MemoryStore, SelectionStore, Step};
use abect_domain::calculator::Platform;
use abect_domain::constants::STORAGE_KEY;
use proptest::prelude::*;
use std::sync::Arc;

const PROJECT_TYPES: [&str; 4] = ["landing", "corporate", "shop", "webapp"];
const ADD_ONS: [&str; 6] =
    ["seo", "copywriting", "multilang", "integrations", "animations", "support"];
const URGENCIES: [&str; 4] = ["urgent", "standard", "relaxed", "undefined"];

fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::fallback().unwrap())
}

fn platform() -> impl Strategy<Value = Platform> {
    prop_oneof![Just(Platform::Alternate), Just(Platform::Standard)]
}

fn add_ons() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::collection::vec(proptest::sample::select(ADD_ONS.to_vec()), 0..8)
}

fn session(project: &str, platform: Platform, pages: u32, add_ons: &[&str]) -> Calculator {
    let mut calc = Calculator::new(catalog());
    calc.set_project_type(project).unwrap();
    calc.set_platform(platform);
    calc.set_page_count(pages);
    for slug in add_ons {
        calc.toggle_add_on(slug).unwrap();
    }
    calc
}

proptest! {
    #[test]
    fn priced_sessions_never_undercut_the_minimum_order(
        project in proptest::sample::select(PROJECT_TYPES.to_vec()),
        platform in platform(),
        pages in 0u32..100,
        add_ons in add_ons(),
        urgency in proptest::option::of(proptest::sample::select(URGENCIES.to_vec())),
    ) {
        let mut calc = session(project, platform, pages, &add_ons);
        if let Some(slug) = urgency {
            calc.set_urgency(slug).unwrap();
        }
        let floor = calc.catalog().settings().minimum_order_price;
        #[allow(clippy::cast_precision_loss)]
        let price = calc.estimate().price as f64;
        prop_assert!(price >= floor);
    }

    #[test]
    fn more_pages_never_cost_less(
        project in proptest::sample::select(PROJECT_TYPES.to_vec()),
        platform in platform(),
        a in 1u32..=30,
        b in 1u32..=30,
        add_ons in add_ons(),
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let cheap = session(project, platform, low, &add_ons);
        let dear = session(project, platform, high, &add_ons);
        prop_assert!(cheap.estimate().price <= dear.estimate().price);
    }

    #[test]
    fn standard_only_types_keep_the_standard_platform(
        platforms in proptest::collection::vec(platform(), 0..6),
    ) {
        let mut calc = Calculator::new(catalog());
        calc.set_project_type("webapp").unwrap();
        for platform in platforms {
            calc.set_platform(platform);
            prop_assert_eq!(calc.selection().platform, Some(Platform::Standard));
        }
    }

    #[test]
    fn toggling_twice_is_a_no_op(
        initial in add_ons(),
        slug in proptest::sample::select(ADD_ONS.to_vec()),
    ) {
        let mut calc = session("shop", Platform::Standard, 5, &initial);
        let before = calc.selection().add_ons.clone();
        calc.toggle_add_on(slug).unwrap();
        calc.toggle_add_on(slug).unwrap();

        // a present add-on is removed and then appended again
        let mut expected: Vec<_> = before.iter().filter(|s| *s != slug).cloned().collect();
        if before.iter().any(|s| s == slug) {
            expected.push(slug.to_owned());
        }
        prop_assert_eq!(&calc.selection().add_ons, &expected);

        let fresh = session("shop", Platform::Standard, 5, &initial);
        prop_assert_eq!(calc.estimate().price, fresh.estimate().price);
    }

    #[test]
    fn reset_matches_a_fresh_session(
        project in proptest::sample::select(PROJECT_TYPES.to_vec()),
        pages in 0u32..100,
        add_ons in add_ons(),
        steps in 0usize..10,
    ) {
        let mut calc = session(project, Platform::Alternate, pages, &add_ons);
        calc.go_to(steps);
        calc.set_contact_fields("Олена", "olena@example.com", "привіт");
        calc.mark_submitted();
        calc.reset();

        let fresh = Calculator::new(catalog());
        prop_assert_eq!(calc.selection(), fresh.selection());
        prop_assert_eq!(calc.estimate(), fresh.estimate());
        prop_assert!(!calc.is_submitted());
    }

    #[test]
    fn persisted_selection_survives_a_restore(
        project in proptest::sample::select(PROJECT_TYPES.to_vec()),
        platform in platform(),
        pages in 0u32..100,
        add_ons in add_ons(),
        urgency in proptest::sample::select(URGENCIES.to_vec()),
        step in 0usize..6,
    ) {
        let store = MemoryStore::new();
        let mut calc = session(project, platform, pages, &add_ons);
        calc.set_urgency(urgency).unwrap();
        calc.go_to(step);
        calc.persist(&store);

        let restored = Calculator::restore(catalog(), &store);
        prop_assert_eq!(restored.snapshot(), calc.snapshot());
        prop_assert_eq!(restored.estimate(), calc.estimate());
    }

    #[test]
    fn arbitrary_mirror_content_restores_a_usable_session(raw in ".{0,200}") {
        let store = MemoryStore::new();
        store.save(STORAGE_KEY, &raw).unwrap();

        let mut calc = Calculator::restore(catalog(), &store);
        prop_assert!(Step::ALL.contains(&calc.step()));
        calc.set_project_type("landing").unwrap();
        prop_assert_eq!(calc.selection().project_type.as_deref(), Some("landing"));
    }
}
