use super::*;
use std::collections::HashMap;

impl Optimizer<'_> {
    /// Aggregates how many pallets of each type were used.
    pub(super) fn count_pallets(&self, allocations: &[Allocation]) -> HashMap<String, u32> {
        let mut counts = HashMap::new();
        for allocation in allocations {
            *counts.entry(allocation.pallet.id.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Builds the multi-item result with totals and collected warnings.
    pub(super) fn summarize(
        &self,
        allocations: Vec<Allocation>,
        unallocated: Vec<UnallocatedItem>,
    ) -> MultiItemResult {
        let total_gross: Decimal = allocations.iter().map(|a| a.price.gross_total).sum();

        let mut warnings: Vec<String> = allocations
            .iter()
            .flat_map(|a| &a.placements)
            .flat_map(|p| p.warnings.iter().map(move |w| format!("{}: {}", p.item_name, w)))
            .collect();

        if allocations.len() > 1 {
            warnings.push(format!(
                "Shipment is split across {} pallets",
                allocations.len()
            ));
        }
        for item in &unallocated {
            warnings.push(format!("{}: fits on no available pallet", item.item_name));
        }

        MultiItemResult {
            pallet_count: allocations.len() as u32,
            pallets_required: self.count_pallets(&allocations),
            total_gross,
            allocations,
            unallocated,
            warnings,
        }
    }
}
