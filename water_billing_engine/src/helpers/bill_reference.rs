use crate::db_types::ResourceId;

/// Pulls a bill id out of a free-text payment description.
///
/// Gateway events carry the description we originally attached to the payment intent, which embeds the bill
/// reference as `bill_id:<digits>`. Anything else in the text is ignored.
pub fn extract_bill_id_from_description(description: &str) -> Option<ResourceId> {
    let bill_ref = regex::Regex::new(r"bill_id:(\d+)").unwrap();
    bill_ref.captures(description).and_then(|c| c.get(1).and_then(|m| m.as_str().parse().ok()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn find_bill_references() {
        let id = extract_bill_id_from_description("");
        assert_eq!(id, None);
        let id = extract_bill_id_from_description("Water bill payment");
        assert_eq!(id, None);
        let id = extract_bill_id_from_description("bill_id:42").unwrap();
        assert_eq!(id, ResourceId::from(42));
        let id = extract_bill_id_from_description("Water bill payment for bill_id:123 (July)").unwrap();
        assert_eq!(id, ResourceId::from(123));
        let id = extract_bill_id_from_description("bill_id:seven");
        assert_eq!(id, None);
        // first reference wins if the text somehow carries two
        let id = extract_bill_id_from_description("bill_id:1 bill_id:2").unwrap();
        assert_eq!(id, ResourceId::from(1));
    }
}
