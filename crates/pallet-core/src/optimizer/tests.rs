use super::*;
use crate::fit::Orientation;
use crate::pricing::{RateTable, RateTier, Surcharges};
use std::collections::HashMap;
use std::str::FromStr;

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn euro_pallet() -> PalletType {
    PalletType {
        id: "euro".into(),
        name: Some("Euro pallet".into()),
        length_m: 1.2,
        width_m: 0.8,
        max_height_cm: 220.0,
        max_weight_kg: 1500.0,
        category: RateCategory::Euro,
    }
}

fn quarter_pallet() -> PalletType {
    PalletType {
        id: "quarter".into(),
        name: Some("Quarter pallet".into()),
        length_m: 0.6,
        width_m: 0.4,
        max_height_cm: 120.0,
        max_weight_kg: 300.0,
        category: RateCategory::Quarter,
    }
}

fn tier(max_weight_kg: &str, local: &str) -> RateTier {
    RateTier {
        max_weight_kg: dec(max_weight_kg),
        prices: [dec(local), dec("60"), dec("70"), dec("80")],
    }
}

fn tariff(pallets: Vec<PalletType>) -> Tariff {
    let rates = RateTable::new(HashMap::from([
        (
            RateCategory::Euro,
            vec![tier("100", "52"), tier("500", "70"), tier("1500", "110")],
        ),
        (
            RateCategory::Quarter,
            vec![tier("50", "29"), tier("300", "42")],
        ),
    ]));

    Tariff {
        pallets,
        rates,
        surcharges: Surcharges {
            minimum_net: dec("35"),
            fuel_percent: dec("10"),
            road_percent: dec("0"),
            vat_percent: dec("20"),
        },
        settings: Settings::default(),
    }
}

fn local() -> ShipmentContext {
    ShipmentContext {
        distance_band: DistanceBand::Local,
        options: TransportOptions::default(),
    }
}

fn item(id: &str, length: f64, width: f64, height: f64, weight: f64) -> Item {
    Item {
        id: id.into(),
        name: format!("Item {}", id),
        length_cm: length,
        width_cm: width,
        height_cm: height,
        weight_kg: weight,
    }
}

/// Every placement stays on its pallet and no two placements overlap.
fn assert_valid_allocation(allocation: &Allocation) {
    let placements = &allocation.placements;
    for p in placements {
        assert!(
            p.x >= 0.0 && p.x + p.width <= allocation.surface_width_cm,
            "{} leaves the pallet across: x={} width={}",
            p.item_id,
            p.x,
            p.width
        );
        assert!(
            p.y >= 0.0 && p.y + p.length <= allocation.surface_length_cm,
            "{} leaves the pallet lengthwise: y={} length={}",
            p.item_id,
            p.y,
            p.length
        );
    }

    for i in 0..placements.len() {
        for j in (i + 1)..placements.len() {
            let a = &placements[i];
            let b = &placements[j];
            let apart = a.x + a.width <= b.x
                || b.x + b.width <= a.x
                || a.y + a.length <= b.y
                || b.y + b.length <= a.y;
            assert!(apart, "{} overlaps {}", a.item_id, b.item_id);
        }
    }
}

#[test]
fn test_recommends_cheapest_pallet() {
    let tariff = tariff(vec![euro_pallet(), quarter_pallet()]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    let result = optimizer.optimize(&item("lamp", 20.0, 15.0, 30.0, 5.0)).unwrap();

    let recommended = result.recommended.unwrap();
    assert_eq!(recommended.pallet.id, "quarter");
    assert_eq!(recommended.orientation, Orientation::Normal);
    // 35 minimum, +10% fuel, +20% VAT
    assert_eq!(recommended.price.gross_total, dec("46.20"));
    assert_eq!(result.alternatives.len(), 1);
    assert_eq!(result.alternatives[0].pallet.id, "euro");
    assert!(result.alternatives[0].price.gross_total > recommended.price.gross_total);
    assert!(result.rejected.is_empty());
}

#[test]
fn test_alternatives_are_bounded() {
    let pallets: Vec<PalletType> = (0..6)
        .map(|i| PalletType {
            id: format!("euro_{}", i),
            ..euro_pallet()
        })
        .collect();
    let tariff = tariff(pallets);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    let result = optimizer.optimize(&item("chair", 50.0, 50.0, 90.0, 8.0)).unwrap();

    // equal prices keep catalogue order
    assert_eq!(result.recommended.unwrap().pallet.id, "euro_0");
    let ids: Vec<&str> = result
        .alternatives
        .iter()
        .map(|q| q.pallet.id.as_str())
        .collect();
    assert_eq!(ids, vec!["euro_1", "euro_2", "euro_3"]);
}

#[test]
fn test_van_caps_weight_below_pallet_limit() {
    let tariff = tariff(vec![euro_pallet()]);
    let context = ShipmentContext {
        distance_band: DistanceBand::Local,
        options: TransportOptions {
            van35: true,
            lift_required: false,
        },
    };
    let optimizer = Optimizer::new(&tariff, context).unwrap();

    let result = optimizer
        .optimize(&item("wardrobe", 100.0, 60.0, 150.0, 450.0))
        .unwrap();

    assert!(result.recommended.is_none());
    assert_eq!(result.rejected.len(), 1);
    assert_eq!(result.rejected[0].reasons, vec![RejectionReason::WeightLimit]);
}

#[test]
fn test_rejection_reasons_accumulate() {
    let mut half = quarter_pallet();
    half.id = "half".into();
    half.category = RateCategory::Half;
    let tariff = tariff(vec![euro_pallet(), half]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    let result = optimizer
        .optimize(&item("sofa", 250.0, 130.0, 50.0, 2000.0))
        .unwrap();

    assert!(result.recommended.is_none());
    assert_eq!(
        result.rejected[0].reasons,
        vec![
            RejectionReason::Overhang,
            RejectionReason::WeightLimit,
            RejectionReason::NoRateMatch,
        ]
    );
    // category without rates surfaces as a rejection, not an error
    assert!(result.rejected[1]
        .reasons
        .contains(&RejectionReason::NoRateMatch));
}

#[test]
fn test_height_limit_when_footprint_fits() {
    let tariff = tariff(vec![euro_pallet()]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    let result = optimizer
        .optimize(&item("shelf", 100.0, 70.0, 210.0, 60.0))
        .unwrap();

    assert_eq!(result.rejected[0].reasons, vec![RejectionReason::HeightLimit]);
}

#[test]
fn test_long_item_is_tilted_with_warning() {
    let tariff = tariff(vec![euro_pallet()]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    let quote = optimizer
        .optimize(&item("bed frame", 200.0, 45.0, 90.0, 35.0))
        .unwrap()
        .recommended
        .unwrap();

    assert!(quote.orientation.is_tilted());
    assert_eq!(quote.item_height_cm, 200.0);
    assert!(quote.warnings.iter().any(|w| w.contains("tilted")));
    assert!(quote.warnings.iter().any(|w| w.contains("height limit")));
}

#[test]
fn test_all_items_share_one_pallet() {
    let tariff = tariff(vec![euro_pallet(), quarter_pallet()]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    let items = vec![
        item("a", 50.0, 30.0, 60.0, 20.0),
        item("b", 40.0, 35.0, 60.0, 20.0),
        item("c", 45.0, 30.0, 40.0, 10.0),
    ];
    let result = optimizer.optimize_multi_item(&items).unwrap();

    assert_eq!(result.pallet_count, 1);
    assert!(result.unallocated.is_empty());
    let allocation = &result.allocations[0];
    assert_eq!(allocation.pallet.id, "euro");
    assert_eq!(allocation.placements.len(), 3);
    assert_eq!(allocation.total_weight_kg, dec("50"));
    assert_eq!(result.total_gross, allocation.price.gross_total);
    assert_valid_allocation(allocation);
}

#[test]
fn test_cheapest_single_pallet_wins() {
    let tariff = tariff(vec![euro_pallet(), quarter_pallet()]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    let items = vec![
        item("a", 20.0, 15.0, 30.0, 5.0),
        item("b", 20.0, 15.0, 30.0, 5.0),
    ];
    let result = optimizer.optimize_multi_item(&items).unwrap();

    assert_eq!(result.pallet_count, 1);
    assert_eq!(result.allocations[0].pallet.id, "quarter");
    assert_valid_allocation(&result.allocations[0]);
}

#[test]
fn test_pallet_sized_items_need_two_pallets() {
    let tariff = tariff(vec![euro_pallet()]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    let items = vec![
        item("desk 1", 110.0, 70.0, 80.0, 40.0),
        item("desk 2", 110.0, 70.0, 80.0, 40.0),
    ];
    let result = optimizer.optimize_multi_item(&items).unwrap();

    assert_eq!(result.pallet_count, 2);
    assert_eq!(result.pallets_required.get("euro"), Some(&2));
    assert!(result.unallocated.is_empty());
    assert_eq!(
        result.total_gross,
        result.allocations[0].price.gross_total + result.allocations[1].price.gross_total
    );
    assert!(result.warnings.iter().any(|w| w.contains("split across 2")));
}

#[test]
fn test_weight_splits_shipment() {
    let tariff = tariff(vec![euro_pallet()]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    let items = vec![
        item("safe 1", 50.0, 50.0, 80.0, 800.0),
        item("safe 2", 50.0, 50.0, 80.0, 800.0),
    ];
    let result = optimizer.optimize_multi_item(&items).unwrap();

    assert_eq!(result.pallet_count, 2);
    for allocation in &result.allocations {
        assert_eq!(allocation.total_weight_kg, dec("800"));
    }
}

#[test]
fn test_unfittable_item_is_unallocated() {
    let tariff = tariff(vec![euro_pallet(), quarter_pallet()]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    let items = vec![
        item("lamp", 20.0, 15.0, 30.0, 5.0),
        item("piano", 300.0, 200.0, 150.0, 400.0),
    ];
    let result = optimizer.optimize_multi_item(&items).unwrap();

    assert_eq!(result.pallet_count, 1);
    assert_eq!(result.allocations[0].placements[0].item_id, "lamp");
    assert_eq!(result.unallocated.len(), 1);
    assert_eq!(result.unallocated[0].item_id, "piano");
    assert_eq!(result.unallocated[0].reason, UnallocatedReason::NoFit);
    assert!(result.warnings.iter().any(|w| w.contains("Item piano")));
}

#[test]
fn test_nothing_fits_yields_empty_allocation() {
    let tariff = tariff(vec![quarter_pallet()]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    let items = vec![
        item("piano", 300.0, 200.0, 150.0, 400.0),
        item("organ", 250.0, 180.0, 150.0, 350.0),
    ];
    let result = optimizer.optimize_multi_item(&items).unwrap();

    assert_eq!(result.pallet_count, 0);
    assert_eq!(result.total_gross, Decimal::ZERO);
    assert_eq!(result.unallocated.len(), 2);
}

#[test]
fn test_group_window_limits_items_per_round() {
    let mut tariff = tariff(vec![euro_pallet()]);
    tariff.settings.group_window = 2;
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    // six small boxes fit one pallet together, so phase one takes them all
    let items: Vec<Item> = (0..6)
        .map(|i| item(&i.to_string(), 20.0, 20.0, 20.0, 5.0))
        .collect();
    let together = optimizer.optimize_multi_item(&items).unwrap();
    assert_eq!(together.pallet_count, 1);

    // one unfittable item forces the greedy phase, which takes two per pallet
    let mut with_blocker = items.clone();
    with_blocker.push(item("piano", 300.0, 200.0, 150.0, 400.0));
    let split = optimizer.optimize_multi_item(&with_blocker).unwrap();
    assert_eq!(split.pallet_count, 3);
    assert!(split
        .allocations
        .iter()
        .all(|a| a.placements.len() == 2));
    assert_eq!(split.unallocated.len(), 1);
}

#[test]
fn test_more_items_per_pallet_beats_cheaper_pallet() {
    let tariff = tariff(vec![quarter_pallet(), euro_pallet()]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    // a quarter pallet takes one box at 46.20, a euro pallet all four at 68.64
    let mut items: Vec<Item> = (0..4)
        .map(|i| item(&format!("box {}", i), 45.0, 30.0, 40.0, 5.0))
        .collect();
    items.push(item("piano", 300.0, 200.0, 150.0, 400.0));
    let result = optimizer.optimize_multi_item(&items).unwrap();

    assert_eq!(result.pallet_count, 1);
    let allocation = &result.allocations[0];
    assert_eq!(allocation.pallet.id, "euro");
    assert_eq!(allocation.placements.len(), 4);
    assert_eq!(result.total_gross, dec("68.64"));
    assert_eq!(result.unallocated.len(), 1);
    assert_eq!(result.unallocated[0].item_id, "piano");
    assert_valid_allocation(allocation);
}

#[test]
fn test_unpriced_group_falls_back_to_fewer_items() {
    let mut tariff = tariff(vec![euro_pallet()]);
    tariff.rates = RateTable::new(HashMap::from([(
        RateCategory::Euro,
        vec![tier("100", "52")],
    )]));
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    // both chairs fit one pallet, but 120 kg has no rate
    let items = vec![
        item("chair 1", 50.0, 50.0, 40.0, 60.0),
        item("chair 2", 50.0, 50.0, 40.0, 60.0),
        item("piano", 300.0, 200.0, 150.0, 400.0),
    ];
    let result = optimizer.optimize_multi_item(&items).unwrap();

    assert_eq!(result.pallet_count, 2);
    for allocation in &result.allocations {
        assert_eq!(allocation.pallet.id, "euro");
        assert_eq!(allocation.placements.len(), 1);
        assert_eq!(allocation.total_weight_kg, dec("60"));
    }
    assert_eq!(result.total_gross, dec("137.28"));
    assert_eq!(result.unallocated.len(), 1);
}

#[test]
fn test_unpriceable_weight_is_invalid_input() {
    let tariff = tariff(vec![euro_pallet()]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();
    let anvil = item("anvil", 50.0, 50.0, 50.0, 1e30);

    assert!(matches!(
        optimizer.optimize(&anvil),
        Err(OptimizerError::InvalidInput(_))
    ));
    assert!(matches!(
        optimizer.optimize_multi_item(&[anvil]),
        Err(OptimizerError::InvalidInput(_))
    ));
}

#[test]
fn test_overflowing_weight_sum_fails_the_joint_fit() {
    let tariff = tariff(vec![euro_pallet()]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    let items = vec![
        item("anvil 1", 50.0, 50.0, 50.0, 7e28),
        item("anvil 2", 50.0, 50.0, 50.0, 7e28),
    ];
    let result = optimizer.optimize_multi_item(&items).unwrap();

    assert_eq!(result.pallet_count, 0);
    assert_eq!(result.total_gross, Decimal::ZERO);
    assert_eq!(result.unallocated.len(), 2);
}

#[test]
fn test_single_item_is_centered() {
    let tariff = tariff(vec![euro_pallet()]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    let result = optimizer
        .optimize_multi_item(&[item("box", 55.0, 35.0, 40.0, 10.0)])
        .unwrap();

    let placement = &result.allocations[0].placements[0];
    assert_eq!(placement.x + placement.width / 2.0, 40.0);
    assert_eq!(placement.y + placement.length / 2.0, 60.0);
}

#[test]
fn test_total_gross_serializes_as_fixed_string() {
    let tariff = tariff(vec![euro_pallet()]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    let result = optimizer
        .optimize_multi_item(&[item("box", 55.0, 35.0, 40.0, 10.0)])
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();

    // 52 base, +10% fuel = 57.20 net, +20% VAT = 68.64
    assert_eq!(json["total_gross"], "68.64");
    assert_eq!(json["allocations"][0]["price"]["net_total"], "57.20");
}

#[test]
fn test_invalid_input_is_an_error() {
    let tariff = tariff(vec![euro_pallet()]);
    let optimizer = Optimizer::new(&tariff, local()).unwrap();

    assert!(matches!(
        optimizer.optimize_multi_item(&[]),
        Err(OptimizerError::InvalidInput(_))
    ));
    assert!(matches!(
        optimizer.optimize(&item("ghost", 0.0, 10.0, 10.0, 1.0)),
        Err(OptimizerError::InvalidInput(_))
    ));
    assert!(matches!(
        optimizer.optimize(&item("ghost", 10.0, 10.0, 10.0, f64::NAN)),
        Err(OptimizerError::InvalidInput(_))
    ));
}

#[test]
fn test_empty_catalogue_is_rejected() {
    let tariff = tariff(Vec::new());
    assert!(matches!(
        Optimizer::new(&tariff, local()),
        Err(OptimizerError::EmptyCatalogue)
    ));
}
