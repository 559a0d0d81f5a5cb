mod bill_reference;

pub use bill_reference::extract_bill_id_from_description;
