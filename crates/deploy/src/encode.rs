//! Transaction payload encoding for contract creation and the ownership call.
//!
//! Constructor arguments for every supported variant are address-typed, so
//! encoding reduces to one fixed-width 32-byte word per argument appended to
//! the creation bytecode. No dynamic ABI types are involved.

/// 4-byte selector of `transferOwnership(address)`.
const TRANSFER_OWNERSHIP_SELECTOR: &str = "f2fde38b";

/// Encode an address as a 32-byte ABI word: strip the prefix, lowercase,
/// left-pad with zeros to 64 hex characters.
fn encode_address_word(address: &str) -> String {
    let stripped = address.trim_start_matches("0x").to_lowercase();
    format!("{stripped:0>64}")
}

/// Assemble the creation data for a deployment: the contract bytecode
/// followed by the ABI-encoded constructor arguments, in order.
pub fn creation_data(bytecode: &str, constructor_args: &[String]) -> String {
    let mut data = if bytecode.starts_with("0x") {
        bytecode.to_string()
    } else {
        format!("0x{bytecode}")
    };
    for arg in constructor_args {
        data.push_str(&encode_address_word(arg));
    }
    data
}

/// Build the calldata for the ownership transfer call.
pub fn transfer_ownership_calldata(beneficiary: &str) -> String {
    format!(
        "0x{TRANSFER_OWNERSHIP_SELECTOR}{}",
        encode_address_word(beneficiary)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_word_is_lowercased_and_padded() {
        let word = encode_address_word("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
        assert_eq!(word.len(), 64);
        assert!(word.starts_with("000000000000000000000000"));
        assert!(word.ends_with("70997970c51812dc3a010c7d01b50e0d17dc79c8"));
    }

    #[test]
    fn test_creation_data_appends_one_word_per_argument() {
        let bytecode = "0x6080604052600a600b565b";
        let args = vec![
            "0x1111111111111111111111111111111111111111".to_string(),
            "0x2222222222222222222222222222222222222222".to_string(),
        ];

        let data = creation_data(bytecode, &args);
        assert!(data.starts_with(bytecode));
        assert_eq!(data.len(), bytecode.len() + 2 * 64);
    }

    #[test]
    fn test_creation_data_without_arguments_is_the_bytecode() {
        assert_eq!(creation_data("0x6080", &[]), "0x6080");
        // A bare artifact without the prefix gains one.
        assert_eq!(creation_data("6080", &[]), "0x6080");
    }

    #[test]
    fn test_transfer_ownership_calldata_shape() {
        let calldata =
            transfer_ownership_calldata("0x69E08874Eaf3eF3AF428F7F4Da2156028B3EaD90");
        assert!(calldata.starts_with("0xf2fde38b"));
        // 2 prefix + 8 selector + 64 word characters.
        assert_eq!(calldata.len(), 74);
        assert!(calldata.ends_with("69e08874eaf3ef3af428f7f4da2156028b3ead90"));
    }
}
