#![no_main]

use libfuzzer_sys::fuzz_target;

use quadfund_types::Amount;

// Decimal amounts arrive from untrusted request bodies. Parsing must never
// panic, and anything accepted must print back to a string that parses to
// the same value.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(amount) = s.parse::<Amount>() {
        let printed = amount.to_string();
        assert_eq!(printed.parse::<Amount>().ok(), Some(amount));
    }

    let _ = serde_json::from_str::<Amount>(s);
});
