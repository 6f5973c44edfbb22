use std::collections::HashMap;
use std::str::FromStr;

use flourish_core::model::PremiumPlan;

const BUILT_IN: [(&str, PremiumPlan); 4] = [
    ("flourish_premium_monthly", PremiumPlan::Monthly),
    ("flourish_premium_annual", PremiumPlan::Annual),
    ("rc_premium_monthly_4_99", PremiumPlan::Monthly),
    ("rc_premium_annual_49_99", PremiumPlan::Annual),
];

/// Maps store product ids to subscription plans
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    products: HashMap<String, PremiumPlan>,
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self {
            products: BUILT_IN
                .iter()
                .map(|(product, plan)| ((*product).to_owned(), *plan))
                .collect(),
        }
    }
}

impl ProductCatalog {
    /// Built-in products plus configured extras
    ///
    /// Extras with a plan name other than monthly or annual are skipped.
    pub fn with_extras<'a>(extras: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        let mut catalog = Self::default();
        for (product, plan) in extras {
            match PremiumPlan::from_str(plan) {
                Ok(plan @ (PremiumPlan::Monthly | PremiumPlan::Annual)) => {
                    catalog.products.insert(product.clone(), plan);
                }
                _ => tracing::warn!(product = %product, plan = %plan, "ignoring product with unknown plan"),
            }
        }
        catalog
    }

    /// Plan for a product, if it is a known subscription product
    pub fn product_to_plan(&self, product_id: &str) -> Option<PremiumPlan> {
        self.products.get(product_id).copied()
    }

    /// Plan granted by a purchase, defaulting to monthly for unknown products
    pub fn granted_plan(&self, product_id: Option<&str>) -> PremiumPlan {
        product_id
            .and_then(|product| self.product_to_plan(product))
            .unwrap_or(PremiumPlan::Monthly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_products() {
        let catalog = ProductCatalog::default();
        assert_eq!(catalog.product_to_plan("flourish_premium_monthly"), Some(PremiumPlan::Monthly));
        assert_eq!(catalog.product_to_plan("rc_premium_annual_49_99"), Some(PremiumPlan::Annual));
        assert_eq!(catalog.product_to_plan("mystery"), None);
    }

    #[test]
    fn unknown_products_grant_monthly() {
        let catalog = ProductCatalog::default();
        assert_eq!(catalog.granted_plan(Some("mystery")), PremiumPlan::Monthly);
        assert_eq!(catalog.granted_plan(None), PremiumPlan::Monthly);
        assert_eq!(catalog.granted_plan(Some("flourish_premium_annual")), PremiumPlan::Annual);
    }

    #[test]
    fn extras_extend_the_catalog() {
        let extras = [
            ("family_annual".to_owned(), "annual".to_owned()),
            ("odd".to_owned(), "hackathon".to_owned()),
        ];
        let catalog = ProductCatalog::with_extras(extras.iter().map(|(k, v)| (k, v)));
        assert_eq!(catalog.product_to_plan("family_annual"), Some(PremiumPlan::Annual));
        assert_eq!(catalog.product_to_plan("odd"), None);
        assert_eq!(catalog.product_to_plan("flourish_premium_monthly"), Some(PremiumPlan::Monthly));
    }
}
