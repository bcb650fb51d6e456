//! The stock label → expression table for the `ad_event_view` source.
//!
//! Dimensions map to plain columns. Metrics are aggregates guarded so that
//! an empty or zero denominator renders `0` rather than NaN or infinity.

pub const BUILTIN_FIELDS: &[(&str, &str)] = &[
    // Dimensions
    ("date", "event_date"),
    ("partner id", "partner_id"),
    ("ad group name", "adgroup_name"),
    ("ad group", "adgroup_name"),
    ("adgroup name", "adgroup_name"),
    ("adgroup", "adgroup_name"),
    ("adgroup lid", "adgroup_lid"),
    ("adgroup hid", "adgroup_hid"),
    ("campaign", "campaign_name"),
    ("campaign name", "campaign_name"),
    ("campaign lid", "campaign_lid"),
    ("campaign hid", "campaign_hid"),
    ("sid", "sid"),
    ("said", "said"),
    ("sid-said", "concat(sid,\"~\",said)"),
    ("advertiser name", "advertiser_name"),
    ("advertiser", "advertiser_name"),
    ("keyword", "viewed_text"),
    ("pub name", "affiliate_account_name"),
    ("publisher name", "affiliate_account_name"),
    ("publisher", "affiliate_account_name"),
    ("publisher lid", "affiliate_account_lid"),
    ("publisher hid", "affiliate_account_hid"),
    ("source name", "traffic_source_name"),
    ("source", "traffic_source_name"),
    ("traffic source lid", "traffic_source_lid"),
    ("traffic source hid", "traffic_source_hid"),
    // Ratio metrics
    (
        "cpc",
        "CASE WHEN sum(paid_clicks) = 0 THEN 0 ELSE round(sum(revenue)/sum(paid_clicks),2) END",
    ),
    (
        "cpa",
        "CASE WHEN sum(actions_worth) = 0 THEN 0 ELSE round(sum(revenue)/sum(actions_worth), 2) END",
    ),
    (
        "ctr",
        "CASE WHEN SUM(impressions) = 0 THEN 0 ELSE COALESCE(ROUND(SUM(paid_clicks)/SUM(impressions), 6), 0) END",
    ),
    (
        "cvr",
        "CASE WHEN SUM(paid_clicks) = 0 THEN 0 ELSE COALESCE(ROUND(SUM(actions_worth) / SUM(paid_clicks), 6), 0) END",
    ),
    (
        "conversion rate",
        "CASE WHEN sum(paid_clicks) = 0 THEN 0 ELSE round(sum(actions_worth)/sum(paid_clicks), 4) END",
    ),
    // Counters
    ("clicks", "COALESCE(sum(paid_clicks),0)"),
    ("conversions", "COALESCE(sum(event_fires),0)"),
    ("reservations", "COALESCE(sum(event_fires),0)"),
    ("actions", "COALESCE(sum(actions_worth),0)"),
    ("conversion value", "round(COALESCE(sum(dollars_worth),0),2)"),
    ("impressions", "round(COALESCE(sum(impressions),0),0)"),
    ("imps", "round(COALESCE(sum(impressions),0),0)"),
    ("spend", "round(COALESCE(sum(revenue),0),2)"),
    ("cost", "round(COALESCE(sum(revenue),0),2)"),
    ("revenue", "round(COALESCE(sum(dollars_worth),0),2)"),
    ("inquiries", "round(COALESCE(sum(actions_worth),0),2)"),
    ("purchases", "round(COALESCE(sum(event_fires),0),2)"),
];
