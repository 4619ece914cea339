use crate::domain::ports::ResponseFormat;
use serde_json::json;

pub const INVOICE_DETECTION_PROMPT: &str = "Is this image a photo of an invoice?";

pub const INVOICE_PROPERTIES_PROMPT: &str = r#"You are reading a scanned or photographed invoice. Extract exactly three fields and answer with JSON only.

invoice_date:
- Use the date that is literally printed on the document as the invoice date. Do not infer it from due dates, delivery dates or postmarks.
- Dates may be written in many styles: "15.01.2024", "01/15/24", "15 Jan 2024", "Jan. 15th, 2024", "15-I-2024" with a Roman numeral month, or a two-digit year. Read the style the document uses and convert it.
- Normalize to YYYY-MM-DD.
- Use null if the date is missing, unreadable, or incomplete (for example the day or the year cannot be read).

total_amount:
- The grand total the customer has to pay, including taxes. Never a subtotal, a tax line, a single item or a running balance.
- Remove currency symbols, currency codes, thousands separators (",", ".", spaces or apostrophes) and trailing punctuation such as "-" or ".-".
- Use "." as the decimal separator. "1.234,50" becomes 1234.50 and "31'496.-" becomes 31496.
- Answer with a number, not a string. Use null if no total is printed.

currency:
- The currency of the total. Map symbols and names to ISO 4217 codes where you recognize them: "€" is EUR, "$" is USD unless the document says otherwise, "£" is GBP, "DM" or "Deutsche Mark" is DEM, "Fr." or "sFr." is CHF.
- If you cannot map it, copy the currency exactly as printed.
- Use null if no currency is shown."#;

pub fn invoice_detection_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "invoice": {
                "type": "boolean",
                "description": "Invoice or not"
            }
        },
        "required": ["invoice"],
        "additionalProperties": false
    })
}

pub fn invoice_properties_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "invoice_date": {
                "type": ["string", "null"],
                "description": "Date of the invoice in the format YYYY-MM-DD. Use null if the date is missing or unreadable."
            },
            "total_amount": {
                "type": ["number", "null"],
                "description": "Final total amount of the invoice as a number, e.g., 31496 or 31496.0. Use null if missing."
            },
            "currency": {
                "type": ["string", "null"],
                "description": "Currency of the invoice (prefer ISO code like EUR, USD, DEM). Use null if missing."
            }
        },
        "required": ["invoice_date", "total_amount", "currency"],
        "additionalProperties": false
    })
}

pub fn invoice_detection_response_format() -> ResponseFormat {
    ResponseFormat::json_schema("invoice_detection", invoice_detection_schema())
}

pub fn invoice_properties_response_format() -> ResponseFormat {
    ResponseFormat::json_schema("invoice_properties", invoice_properties_schema())
}
