use super::joint::JointFit;
use super::*;
use std::cmp::Ordering;

impl Optimizer<'_> {
    /// Distributes `items` over the cheapest set of pallets found.
    ///
    /// First looks for a single pallet carrying everything. If none exists,
    /// pallets are filled greedily, each round committing the pallet and
    /// group size with the lowest gross price per item. Items that fit no
    /// pallet on their own end up in `unallocated`.
    pub fn optimize_multi_item(&self, items: &[Item]) -> Result<MultiItemResult> {
        validate_items(items)?;

        let pallets = self.pallets_by_approximate_rate();
        let sorted = self.sort_by_footprint(items);

        let (allocations, unallocated) = match self.single_pallet_allocation(&pallets, &sorted) {
            Some(allocation) => (vec![allocation], Vec::new()),
            None => self.greedy_allocation(&pallets, sorted),
        };

        Ok(self.summarize(allocations, unallocated))
    }

    /// Pallet types ordered by their rate at the reference weight; unpriced last.
    fn pallets_by_approximate_rate(&self) -> Vec<&PalletType> {
        let reference = to_decimal(self.settings().reference_weight_kg);
        let mut pallets: Vec<(&PalletType, Decimal)> = self
            .tariff
            .pallets
            .iter()
            .map(|pallet| {
                let rate = self.find_rate(pallet, reference).unwrap_or(Decimal::MAX);
                (pallet, rate)
            })
            .collect();
        pallets.sort_by(|a, b| a.1.cmp(&b.1));
        pallets.into_iter().map(|(pallet, _)| pallet).collect()
    }

    /// Largest footprint (margin included) first.
    fn sort_by_footprint(&self, items: &[Item]) -> Vec<Item> {
        let margin = self.settings().packaging_margin_cm;
        let area = |item: &Item| (item.length_cm + margin) * (item.width_cm + margin);

        let mut sorted = items.to_vec();
        sorted.sort_by(|a, b| area(b).partial_cmp(&area(a)).unwrap_or(Ordering::Equal));
        sorted
    }

    /// First pallet, in price order, that carries every item at once.
    fn single_pallet_allocation(
        &self,
        pallets: &[&PalletType],
        items: &[Item],
    ) -> Option<Allocation> {
        pallets.iter().find_map(|pallet| {
            let joint = self.joint_fit(items, pallet)?;
            let rate = self.find_rate(pallet, joint.total_weight)?;
            debug!(pallet = %pallet.id, items = items.len(), "single pallet carries all items");
            Some(self.build_allocation(pallet, joint, rate))
        })
    }

    /// Fills pallets one at a time from the front of `remaining`.
    fn greedy_allocation(
        &self,
        pallets: &[&PalletType],
        mut remaining: Vec<Item>,
    ) -> (Vec<Allocation>, Vec<UnallocatedItem>) {
        let mut allocations = Vec::new();
        let mut unallocated = Vec::new();

        while !remaining.is_empty() {
            let window = self.settings().group_window.min(remaining.len());
            let mut best: Option<(Decimal, usize, Allocation)> = None;

            for pallet in pallets {
                for count in (1..=window).rev() {
                    let Some(joint) = self.joint_fit(&remaining[..count], pallet) else {
                        continue;
                    };
                    let Some(rate) = self.find_rate(pallet, joint.total_weight) else {
                        continue;
                    };

                    let allocation = self.build_allocation(pallet, joint, rate);
                    let per_item = allocation.price.gross_total / Decimal::from(count);
                    if best.as_ref().map_or(true, |(cheapest, _, _)| per_item < *cheapest) {
                        best = Some((per_item, count, allocation));
                    }
                    // smaller groups on this pallet are not tried once one fits
                    break;
                }
            }

            match best {
                Some((per_item, count, allocation)) => {
                    debug!(
                        pallet = %allocation.pallet.id,
                        count,
                        %per_item,
                        "committed pallet"
                    );
                    remaining = remaining.split_off(count);
                    allocations.push(allocation);
                }
                None => {
                    let item = remaining.remove(0);
                    debug!(item = %item.id, "item fits no pallet");
                    unallocated.push(UnallocatedItem {
                        item_id: item.id.clone(),
                        item_name: item.display_name().to_string(),
                        reason: UnallocatedReason::NoFit,
                    });
                }
            }
        }

        (allocations, unallocated)
    }

    fn build_allocation(&self, pallet: &PalletType, joint: JointFit, rate: Decimal) -> Allocation {
        let tilted = joint
            .placements
            .iter()
            .filter(|p| p.orientation.is_tilted())
            .count();

        let mut notes = vec![format!(
            "{} item(s) on {} ({:.0} x {:.0} cm)",
            joint.placements.len(),
            pallet.display_name(),
            joint.surface_length,
            joint.surface_width
        )];
        if tilted > 0 {
            notes.push(format!("{} item(s) loaded tilted", tilted));
        }

        Allocation {
            pallet: pallet.clone(),
            surface_width_cm: joint.surface_width,
            surface_length_cm: joint.surface_length,
            limits: joint.limits,
            placements: joint.placements,
            total_weight_kg: joint.total_weight,
            price: calculate_price(rate, &self.tariff.surcharges),
            notes,
        }
    }
}
