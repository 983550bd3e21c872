// Chain rules shared by the mock node, the harness and bots

// Native token symbol, every other symbol is simulated through rich messages
pub const NATIVE_TOKEN: &str = "ADM";

// 8 decimals for the native token
pub const COIN_DECIMALS: u32 = 8;
pub const COIN_VALUE: u64 = 10u64.pow(COIN_DECIMALS);

// Fixed fees, in atomic units
pub const CHAT_MESSAGE_FEE: u64 = 100_000;
pub const SEND_FEE: u64 = 50_000_000;

// Chain epoch: 2017-09-02T17:00:00Z in seconds since UNIX epoch
pub const EPOCH_UNIX_SECONDS: u64 = 1_504_371_600;

// Passphrase used by test bots when none is given
pub const DEFAULT_BOT_PASSPHRASE: &str =
    "apple banana cherry date elderberry fig grape hazelnut iris juniper kiwi lemon";

// Prefix of every command message, e.g. "/start"
pub const COMMAND_PREFIX: char = '/';

/// Converts a coin amount (e.g. `0.5`) into atomic units.
///
/// Negative and non-finite amounts are clamped to zero.
pub fn to_atomic_units(amount: f64) -> u64 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0;
    }

    (amount * COIN_VALUE as f64).round() as u64
}

/// Converts atomic units back into a coin amount.
pub fn from_atomic_units(value: u64) -> f64 {
    value as f64 / COIN_VALUE as f64
}
