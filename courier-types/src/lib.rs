//! Bot API catalogue: enums, union families, objects and method requests.
//!
//! # Overview
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`enums`]     | Closed enums with their wire tokens                         |
//! | [`types`]     | Objects and tagged union families                           |
//! | [`functions`] | API methods as structs implementing [`Request`]             |
//!
//! # Usage
//!
//! ```rust
//! use courier_types::{enums::ParseMode, functions::SendMessage};
//! use courier_codec::{Request, RequestEncoder};
//!
//! let req = SendMessage::new(42, "*hi*").parse_mode(ParseMode::MarkdownV2);
//! assert_eq!(SendMessage::METHOD, "sendMessage");
//! let body = RequestEncoder::default().encode(req).unwrap();
//! assert!(!body.is_multipart());
//! ```

#![deny(unsafe_code)]

pub mod enums;
pub mod functions;
pub mod types;

pub use courier_codec::{FromJson, InputFile, LossyVec, Request, ToJson, Upload};
pub use types::ChatId;

use courier_codec::{CatalogueError, check_family, check_table};

/// Check every token table and union family of the catalogue.
///
/// Run by the test suite; cheap enough to call once at startup as well.
pub fn check_catalogue() -> Result<(), CatalogueError> {
    check_table::<enums::ParseMode>()?;
    check_table::<enums::ChatType>()?;
    check_table::<enums::ChatAction>()?;
    check_table::<enums::MessageEntityType>()?;
    check_table::<enums::StickerType>()?;
    check_table::<enums::ReactionTypeKind>()?;
    check_table::<enums::InputMediaKind>()?;
    check_table::<enums::ChatMemberStatus>()?;
    check_table::<enums::BotCommandScopeKind>()?;

    check_family::<types::ReactionType>()?;
    check_family::<types::InputMedia>()?;
    check_family::<types::ChatMember>()?;
    check_family::<types::BotCommandScope>()?;
    Ok(())
}
