//! Prompt builders
//!
//! Pure functions from pipeline state to prompt text. Both prompts
//! pin the exact JSON shape the schema layer validates, and the
//! extraction prompt anchors relative dates to an explicit `today`
//! so the same input yields the same prompt on the same day.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::domain::{DressCode, EventDescriptor};

/// Resolve "this weekend" the way the prompt instructs the model to:
/// the upcoming Saturday, or a week out when today already is one.
pub fn upcoming_saturday(today: NaiveDate) -> NaiveDate {
    let days_ahead = match (Weekday::Sat.num_days_from_monday() + 7
        - today.weekday().num_days_from_monday())
        % 7
    {
        0 => 7,
        d => d,
    };
    today + Duration::days(i64::from(days_ahead))
}

fn dress_code_guidance() -> String {
    let valid: Vec<&str> = DressCode::ALL.iter().map(DressCode::as_str).collect();
    let mut out = format!("dressCode must be one of: {}.\n", valid.join(", "));
    out.push_str("  Keywords (first match wins):\n");
    for (keyword, code) in DressCode::keyword_map() {
        out.push_str(&format!("  - \"{keyword}\" => {code}\n"));
    }
    out.push_str("  - otherwise => smart-casual\n");
    out
}

/// The extraction prompt. `user_message` is quoted verbatim at the
/// end so instruction text always precedes untrusted input.
pub fn extraction(user_message: &str, today: NaiveDate) -> String {
    let tomorrow = today + Duration::days(1);
    let next_week = today + Duration::days(7);
    let weekend = upcoming_saturday(today);

    format!(
        r#"You are an event-details extractor for an outfit planning service.
Read the user's message and return ONLY a JSON object of this exact shape:

{{
  "success": true,
  "data": {{
    "occasion": "<short description of the event>",
    "location": "<city or place name, or null if not mentioned>",
    "startDate": "<YYYY-MM-DD, or null if not stated and not inferable>",
    "duration": <number of days, integer >= 1>,
    "dressCode": "<casual | smart-casual | business | formal | black-tie>",
    "budget": <number in dollars, or null>,
    "specialRequirements": ["<requirement>", ...],
    "needsClarification": ["<missing field the user should confirm>", ...],
    "confidence": <0.0 to 1.0>,
    "dailyPlans": [{{"day": 1, "activity": "<activity>", "dressCode": "<code>"}}, ...]
  }}
}}

Rules:
- Today is {today}. Resolve relative dates against it:
  "tomorrow" => {tomorrow}, "next week" => {next_week}, "this weekend" => {weekend}.
- duration: "a weekend" means 2 days, "a week" means 7 days.
- Omit dailyPlans entirely for single-day events. For multi-day events
  list one entry per day with day numbers starting at 1.
- {dress_codes}
- confidence: 0.9+ when occasion, location and dates are all explicit;
  0.6-0.8 when you inferred a field; 0.5 or lower when guessing.
- List every field you had to guess in needsClarification.

Examples:

Message: "I need outfits for a 3-day music festival in the UK"
{{"success": true, "data": {{"occasion": "music festival", "location": "United Kingdom", "startDate": null, "duration": 3, "dressCode": "casual", "budget": null, "specialRequirements": [], "needsClarification": ["start date"], "confidence": 0.85, "dailyPlans": [{{"day": 1, "activity": "festival day", "dressCode": "casual"}}, {{"day": 2, "activity": "festival day", "dressCode": "casual"}}, {{"day": 3, "activity": "festival day", "dressCode": "casual"}}]}}}}

Message: "Job interview in London tomorrow"
{{"success": true, "data": {{"occasion": "job interview", "location": "London", "startDate": "{tomorrow}", "duration": 1, "dressCode": "business", "budget": null, "specialRequirements": [], "needsClarification": [], "confidence": 0.95}}}}

Message: "Something nice for this weekend, budget around 200"
{{"success": true, "data": {{"occasion": "weekend outing", "location": null, "startDate": "{weekend}", "duration": 2, "dressCode": "smart-casual", "budget": 200, "specialRequirements": [], "needsClarification": ["location", "occasion"], "confidence": 0.6, "dailyPlans": [{{"day": 1, "activity": "weekend outing", "dressCode": "smart-casual"}}, {{"day": 2, "activity": "weekend outing", "dressCode": "smart-casual"}}]}}}}

User message:
"{user_message}"

Respond with the JSON object only. No prose, no markdown fences."#,
        today = today,
        tomorrow = tomorrow,
        next_week = next_week,
        weekend = weekend,
        dress_codes = dress_code_guidance().trim_end(),
        user_message = user_message,
    )
}

fn trip_block(details: &EventDescriptor) -> String {
    let mut out = format!(
        "Occasion: {}\nDuration: {} day(s)\nDress code: {}\n",
        details.occasion, details.duration, details.dress_code
    );
    if let Some(location) = &details.location {
        out.push_str(&format!("Location: {location}\n"));
    }
    if let Some(start) = details.start_date {
        out.push_str(&format!("Start date: {start}\n"));
    }
    if let Some(budget) = details.budget {
        out.push_str(&format!("Budget: ${budget:.0}\n"));
    }
    if !details.special_requirements.is_empty() {
        out.push_str(&format!(
            "Special requirements: {}\n",
            details.special_requirements.join(", ")
        ));
    }
    if let Some(plans) = &details.daily_plans {
        out.push_str("Daily plans:\n");
        for plan in plans {
            out.push_str(&format!(
                "  Day {}: {} ({})\n",
                plan.day, plan.activity, plan.dress_code
            ));
        }
    }
    out
}

/// The generation prompt: confirmed trip details, the accumulated
/// context summary, the catalog table, and the exact response shape.
pub fn generation(details: &EventDescriptor, catalog_text: &str, context_summary: &str) -> String {
    format!(
        r#"You are an outfit stylist. Plan one outfit per day for the trip below,
choosing items ONLY from the catalog. Reuse versatile items across days
where it makes sense.

Trip:
{trip}
Context:
{context}

{catalog}

Return ONLY a JSON object of this exact shape:

{{
  "tripDetails": {{
    "occasion": "<occasion>",
    "location": "<location or null>",
    "duration": {duration},
    "dressCode": "<dress code>"
  }},
  "dailyOutfits": [
    {{
      "day": 1,
      "activity": "<what the day holds>",
      "outfit": {{
        "topwear": {{"sku": "<SKU>", "name": "<name>"}},
        "bottomwear": {{"sku": "<SKU>", "name": "<name>"}},
        "footwear": {{"sku": "<SKU>", "name": "<name>"}},
        "outerwear": {{"sku": "<SKU>", "name": "<name>"}} or null,
        "accessories": [{{"sku": "<SKU>", "name": "<name>"}}, ...]
      }},
      "styling": {{
        "rationale": "<why this outfit works for the day>",
        "weatherConsiderations": "<how it handles the forecast>",
        "dresscodeCompliance": "<how it meets the dress code>"
      }}
    }}
  ]
}}

Rules:
- Exactly {duration} dailyOutfits entries, day numbers 1 through {duration}.
- topwear, bottomwear and footwear are required every day.
- outerwear is null when the weather does not call for it.
- Every sku must appear in the catalog above. Never invent SKUs.
- All three styling fields must be non-empty sentences.

Respond with the JSON object only. No prose, no markdown fences."#,
        trip = trip_block(details).trim_end(),
        context = context_summary.trim_end(),
        catalog = catalog_text.trim_end(),
        duration = details.duration,
    )
}
