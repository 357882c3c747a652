//! API methods as request structs implementing [`Request`](courier_codec::Request).
//!
//! Every struct has a `new` taking its required fields; optional fields are
//! set through the fluent setters generated for every field.

use courier_codec::{InputFile, bot_method};

use crate::enums::{ChatAction, ParseMode};
use crate::types::{
    BotCommand, BotCommandScope, ChatId, ChatMember, InputMedia, Message, MessageEntity,
    ReactionType, Update, User,
};

bot_method! {
    /// Basic information about the bot itself.
    pub struct GetMe => "getMe" -> User {}
}

bot_method! {
    /// Long-poll for incoming updates.
    pub struct GetUpdates => "getUpdates" -> Vec<Update> {
        /// First update to return; confirms every update before it.
        optional offset: i64,
        optional limit: i64,
        /// Long-polling timeout in seconds.
        optional timeout: i64,
        optional allowed_updates: Vec<String>,
    }
}

bot_method! {
    pub struct SendMessage => "sendMessage" -> Message {
        required chat_id: ChatId,
        optional message_thread_id: i64,
        required text: String,
        optional parse_mode: ParseMode,
        optional entities: Vec<MessageEntity>,
        optional disable_notification: bool,
        optional protect_content: bool,
    }
}

bot_method! {
    pub struct SendPhoto => "sendPhoto" -> Message {
        required chat_id: ChatId,
        optional message_thread_id: i64,
        required photo: InputFile,
        optional caption: String,
        optional parse_mode: ParseMode,
        optional caption_entities: Vec<MessageEntity>,
        optional has_spoiler: bool,
        optional disable_notification: bool,
        optional protect_content: bool,
    }
}

bot_method! {
    pub struct SendDocument => "sendDocument" -> Message {
        required chat_id: ChatId,
        optional message_thread_id: i64,
        required document: InputFile,
        /// Uploads only; the server ignores file ids and URLs here.
        optional thumbnail: InputFile,
        optional caption: String,
        optional parse_mode: ParseMode,
        optional caption_entities: Vec<MessageEntity>,
        optional disable_content_type_detection: bool,
        optional disable_notification: bool,
        optional protect_content: bool,
    }
}

bot_method! {
    /// Send 2–10 photos, videos, documents or audios as an album.
    pub struct SendMediaGroup => "sendMediaGroup" -> Vec<Message> {
        required chat_id: ChatId,
        optional message_thread_id: i64,
        required media: Vec<InputMedia>,
        optional disable_notification: bool,
        optional protect_content: bool,
    }
}

bot_method! {
    pub struct SendChatAction => "sendChatAction" -> bool {
        required chat_id: ChatId,
        optional message_thread_id: i64,
        required action: ChatAction,
    }
}

bot_method! {
    /// Replace the bot's reactions on a message; an empty list removes them.
    pub struct SetMessageReaction => "setMessageReaction" -> bool {
        required chat_id: ChatId,
        required message_id: i64,
        optional reaction: Vec<ReactionType>,
        optional is_big: bool,
    }
}

bot_method! {
    pub struct SetMyCommands => "setMyCommands" -> bool {
        required commands: Vec<BotCommand>,
        optional scope: BotCommandScope,
        optional language_code: String,
    }
}

bot_method! {
    pub struct GetChatMember => "getChatMember" -> ChatMember {
        required chat_id: ChatId,
        required user_id: i64,
    }
}

// ─── Constructors ────────────────────────────────────────────────────────────

impl GetMe {
    pub fn new() -> Self { Self::default() }
}

impl GetUpdates {
    pub fn new() -> Self { Self::default() }
}

impl SendMessage {
    pub fn new(chat_id: impl Into<ChatId>, text: impl Into<String>) -> Self {
        Self::default().chat_id(chat_id).text(text)
    }
}

impl SendPhoto {
    pub fn new(chat_id: impl Into<ChatId>, photo: impl Into<InputFile>) -> Self {
        Self::default().chat_id(chat_id).photo(photo)
    }
}

impl SendDocument {
    pub fn new(chat_id: impl Into<ChatId>, document: impl Into<InputFile>) -> Self {
        Self::default().chat_id(chat_id).document(document)
    }
}

impl SendMediaGroup {
    pub fn new(chat_id: impl Into<ChatId>, media: impl IntoIterator<Item = InputMedia>) -> Self {
        Self::default().chat_id(chat_id).media(media.into_iter().collect::<Vec<_>>())
    }
}

impl SendChatAction {
    pub fn new(chat_id: impl Into<ChatId>, action: ChatAction) -> Self {
        Self::default().chat_id(chat_id).action(action)
    }
}

impl SetMessageReaction {
    pub fn new(chat_id: impl Into<ChatId>, message_id: i64) -> Self {
        Self::default().chat_id(chat_id).message_id(message_id)
    }
}

impl SetMyCommands {
    pub fn new(commands: impl IntoIterator<Item = BotCommand>) -> Self {
        Self::default().commands(commands.into_iter().collect::<Vec<_>>())
    }
}

impl GetChatMember {
    pub fn new(chat_id: impl Into<ChatId>, user_id: i64) -> Self {
        Self::default().chat_id(chat_id).user_id(user_id)
    }
}
