use serde::{Deserialize, Serialize};

/// A single fee or discount line in a scenario's price breakdown.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PriceLineItem {
    pub name: String,
    pub amount: f64,
    pub description: String,
}

impl PriceLineItem {
    pub fn new(name: &str, amount: f64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            amount,
            description: description.to_string(),
        }
    }
}

/// A named pricing option (service tier) with its own fee/discount structure.
///
/// `rating` and `reviews` are display metadata only; they never enter the
/// total calculation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingScenario {
    pub id: String,
    pub label: String,
    /// Advertised headline price shown on the selection card.
    pub price: f64,
    pub savings: f64,
    pub delivery_time: String,
    pub base_price: f64,
    pub rating: f64,
    pub reviews: u32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub additional_fees: Vec<PriceLineItem>,
    #[serde(default)]
    pub discounts: Vec<PriceLineItem>,
}

/// The marketplace's stock service tiers, used when the upstream forecast
/// payload does not carry its own scenario table.
pub fn default_catalog() -> Vec<PricingScenario> {
    vec![
        PricingScenario {
            id: "instant".to_string(),
            label: "Instant Service".to_string(),
            price: 299.99,
            savings: 50.0,
            delivery_time: "2-3 hours".to_string(),
            base_price: 349.99,
            rating: 4.8,
            reviews: 1245,
            features: vec![
                "Immediate service availability".to_string(),
                "Fixed price guarantee".to_string(),
                "Professional movers".to_string(),
                "Insurance coverage".to_string(),
                "Real-time tracking".to_string(),
                "Priority support".to_string(),
            ],
            additional_fees: vec![
                PriceLineItem::new(
                    "Distance Fee",
                    25.00,
                    "Based on pickup to dropoff distance",
                ),
                PriceLineItem::new("Floor Access", 15.00, "For locations above ground floor"),
            ],
            discounts: vec![
                PriceLineItem::new(
                    "First-time User",
                    25.00,
                    "Special discount for new customers",
                ),
                PriceLineItem::new("Weekday Booking", 10.00, "Discount for weekday service"),
            ],
        },
        PricingScenario {
            id: "bidding".to_string(),
            label: "Competitive Bidding".to_string(),
            price: 249.99,
            savings: 100.0,
            delivery_time: "24-48 hours".to_string(),
            base_price: 349.99,
            rating: 4.6,
            reviews: 892,
            features: vec![
                "Competitive pricing".to_string(),
                "Multiple mover options".to_string(),
                "Price comparison".to_string(),
                "Flexible scheduling".to_string(),
                "Custom quotes".to_string(),
                "Negotiation options".to_string(),
            ],
            additional_fees: vec![
                PriceLineItem::new("Multiple Quotes", 0.00, "Free price comparison"),
                PriceLineItem::new("Express Processing", 20.00, "Faster quote processing"),
            ],
            discounts: vec![
                PriceLineItem::new("Bulk Booking", 50.00, "Discount for multiple items"),
                PriceLineItem::new("Seasonal Offer", 30.00, "Limited time discount"),
            ],
        },
        PricingScenario {
            id: "journey".to_string(),
            label: "Multi-Stop Journey".to_string(),
            price: 399.99,
            savings: 150.0,
            delivery_time: "Custom schedule".to_string(),
            base_price: 549.99,
            rating: 4.9,
            reviews: 567,
            features: vec![
                "Multi-stop service".to_string(),
                "Customized route".to_string(),
                "Flexible timing".to_string(),
                "Premium support".to_string(),
                "Dedicated coordinator".to_string(),
                "Priority handling".to_string(),
            ],
            additional_fees: vec![
                PriceLineItem::new("Additional Stops", 35.00, "Per additional stop"),
                PriceLineItem::new("Route Optimization", 20.00, "Optimal route planning"),
            ],
            discounts: vec![
                PriceLineItem::new("Long-term Booking", 75.00, "For advance bookings"),
                PriceLineItem::new("Premium Service", 40.00, "Premium service package"),
            ],
        },
    ]
}
