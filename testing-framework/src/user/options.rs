//! What a simulated user can send

use serde::{Deserialize, Serialize};

use chatnet_common::config::{COMMAND_PREFIX, NATIVE_TOKEN};

/// Body of a chat message
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    /// Bot command, sent as `/<name> <args...>`
    Command {
        /// Command name without the prefix
        name: String,
        /// Arguments appended after the name
        args: Vec<String>,
    },
    /// Free text
    Text(String),
}

/// Chat message sent with [`crate::UserControls::sends`]
#[derive(Debug, Clone, PartialEq)]
pub struct Sends {
    body: MessageBody,
    amount: Option<f64>,
}

impl Sends {
    /// Bot command, e.g. `Sends::command("start")` for `/start`
    pub fn command<S: Into<String>>(name: S) -> Self {
        Self {
            body: MessageBody::Command {
                name: name.into(),
                args: Vec::new(),
            },
            amount: None,
        }
    }

    /// Plain text message
    pub fn message<S: Into<String>>(text: S) -> Self {
        Self {
            body: MessageBody::Text(text.into()),
            amount: None,
        }
    }

    /// Append command arguments, ignored for plain text messages
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let MessageBody::Command { args: current, .. } = &mut self.body {
            current.extend(args.into_iter().map(Into::into));
        }
        self
    }

    /// Attach an amount of native coins to the message
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Message body
    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    /// Attached amount in coins, if any
    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    /// Text as it is encrypted into the transaction
    pub fn text(&self) -> String {
        match &self.body {
            MessageBody::Text(text) => text.clone(),
            MessageBody::Command { name, args } => {
                let mut text = format!("{}{}", COMMAND_PREFIX, name);
                for arg in args {
                    text.push(' ');
                    text.push_str(arg);
                }
                text
            }
        }
    }
}

/// Token transfer sent with [`crate::UserControls::transfers`]
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    amount: f64,
    token: String,
}

impl Transfer {
    /// Transfer of the chain's native coin
    pub fn native(amount: f64) -> Self {
        Self::token(amount, NATIVE_TOKEN)
    }

    /// Transfer of any token; the symbol is case-insensitive
    pub fn token<S: AsRef<str>>(amount: f64, token: S) -> Self {
        Self {
            amount,
            token: token.as_ref().to_uppercase(),
        }
    }

    /// Amount in coins of the token
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Upper-cased token symbol
    pub fn token_symbol(&self) -> &str {
        &self.token
    }

    /// Whether this moves native coins on chain instead of being announced in chat
    pub fn is_native(&self) -> bool {
        self.token == NATIVE_TOKEN
    }
}

/// Extra content attached to a transfer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferOptions {
    /// Comment shown with the transfer, ignored for native transfers
    pub message: Option<String>,
    /// Hash of the transfer on the token's own chain
    pub hash: Option<String>,
    /// Text shown by clients unable to render the transfer
    pub text_fallback: Option<String>,
}

impl TransferOptions {
    /// Attach a comment
    pub fn with_message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach the external transaction hash
    pub fn with_hash<S: Into<String>>(mut self, hash: S) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Attach a fallback text
    pub fn with_text_fallback<S: Into<String>>(mut self, text: S) -> Self {
        self.text_fallback = Some(text.into());
        self
    }
}

/// Rich chat message announcing a transfer of a non-native token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTransferMessage {
    /// `<TOKEN>_transaction`
    #[serde(rename = "type")]
    pub kind: String,
    /// Amount in coins of the token
    pub amount: f64,
    /// Free comment, empty when none
    pub comments: String,
    /// External transaction hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Fallback text for clients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_fallback: Option<String>,
}

impl RichTransferMessage {
    /// Envelope describing `transfer`
    pub fn new(transfer: &Transfer, options: &TransferOptions) -> Self {
        Self {
            kind: format!("{}_transaction", transfer.token_symbol()),
            amount: transfer.amount(),
            comments: options.message.clone().unwrap_or_default(),
            hash: options.hash.clone(),
            text_fallback: options.text_fallback.clone(),
        }
    }
}
