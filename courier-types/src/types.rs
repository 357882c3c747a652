//! Objects and union families.
//!
//! Request-only types (the `InputMedia*` family) hold [`InputFile`]s and are
//! therefore neither `Clone` nor `PartialEq`; everything the server sends
//! back is.

use courier_codec::serde_json::Value;
use courier_codec::{
    Context, FromJson, InputFile, LossyVec, Result, ToJson, json_object, kind_of, tagged_union,
};

use crate::enums::{
    BotCommandScopeKind, ChatMemberStatus, ChatType, InputMediaKind, MessageEntityType, ParseMode,
    ReactionTypeKind,
};

// ─── ChatId ──────────────────────────────────────────────────────────────────

/// A chat: its numeric id, or the `@username` of a public chat.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self { Self::Id(id) }
}

impl From<i32> for ChatId {
    fn from(id: i32) -> Self { Self::Id(id.into()) }
}

impl From<&str> for ChatId {
    fn from(username: &str) -> Self { Self::Username(username.to_owned()) }
}

impl From<String> for ChatId {
    fn from(username: String) -> Self { Self::Username(username) }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) => f.write_str(name),
        }
    }
}

impl ToJson for ChatId {
    fn to_json(&self, _: &mut Context) -> Result<Value> {
        Ok(match self {
            Self::Id(id) => Value::from(*id),
            Self::Username(name) => Value::String(name.clone()),
        })
    }
}

impl FromJson for ChatId {
    fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(name) => Ok(Self::Username(name.clone())),
            Value::Number(_) => i64::from_json(value).map(Self::Id),
            other => Err(courier_codec::Error::new(courier_codec::ErrorKind::InvalidType {
                expected: "chat id or username",
                found: kind_of(other),
            })),
        }
    }
}

// ─── Users and chats ─────────────────────────────────────────────────────────

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct User {
        pub id: i64,
        pub is_bot: bool,
        pub first_name: String,
        pub last_name: Option<String>,
        pub username: Option<String>,
        pub language_code: Option<String>,
        pub is_premium: Option<bool>,
    }
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct Chat {
        pub id: i64,
        pub kind as "type": ChatType,
        pub title: Option<String>,
        pub username: Option<String>,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub is_forum: Option<bool>,
    }
}

// ─── Messages ────────────────────────────────────────────────────────────────

json_object! {
    /// A special span of text: a link, a mention, some formatting.
    #[derive(Clone, Debug, PartialEq)]
    pub struct MessageEntity {
        pub kind as "type": MessageEntityType,
        /// Offset in UTF-16 code units.
        pub offset: i64,
        pub length: i64,
        pub url: Option<String>,
        pub user: Option<User>,
        pub language: Option<String>,
        pub custom_emoji_id: Option<String>,
    }
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct PhotoSize {
        pub file_id: String,
        pub file_unique_id: String,
        pub width: i64,
        pub height: i64,
        pub file_size: Option<i64>,
    }
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct Document {
        pub file_id: String,
        pub file_unique_id: String,
        pub thumbnail: Option<PhotoSize>,
        pub file_name: Option<String>,
        pub mime_type: Option<String>,
        pub file_size: Option<i64>,
    }
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct Message {
        pub message_id: i64,
        pub message_thread_id: Option<i64>,
        pub from: Option<User>,
        pub sender_chat: Option<Chat>,
        pub date: i64,
        pub chat: Chat,
        pub reply_to_message: Option<Box<Message>>,
        pub media_group_id: Option<String>,
        pub text: Option<String>,
        pub entities: Option<Vec<MessageEntity>>,
        pub caption: Option<String>,
        pub caption_entities: Option<Vec<MessageEntity>>,
        pub photo: Option<Vec<PhotoSize>>,
        pub document: Option<Document>,
    }
}

impl Message {
    /// The text, or the caption of a media message.
    pub fn text_or_caption(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct BotCommand {
        pub command: String,
        pub description: String,
    }
}

// ─── Reactions ───────────────────────────────────────────────────────────────

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct ReactionTypeEmoji { pub emoji: String }
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct ReactionTypeCustomEmoji { pub custom_emoji_id: String }
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct ReactionTypePaid {}
}

tagged_union! {
    #[derive(Clone, Debug, PartialEq)]
    pub enum ReactionType : ReactionTypeKind as "type" {
        Emoji(ReactionTypeEmoji) => Emoji,
        CustomEmoji(ReactionTypeCustomEmoji) => CustomEmoji,
        Paid(ReactionTypePaid) => Paid,
    }
}

impl ReactionType {
    pub fn emoji(emoji: impl Into<String>) -> Self {
        Self::Emoji(ReactionTypeEmoji { emoji: emoji.into() })
    }

    pub fn custom_emoji(id: impl Into<String>) -> Self {
        Self::CustomEmoji(ReactionTypeCustomEmoji { custom_emoji_id: id.into() })
    }
}

json_object! {
    /// A change of the reactions on a message.
    ///
    /// Reactions of kinds this catalogue does not know are dropped from the
    /// lists instead of failing the whole update.
    #[derive(Clone, Debug, PartialEq)]
    pub struct MessageReactionUpdated {
        pub chat: Chat,
        pub message_id: i64,
        pub user: Option<User>,
        pub actor_chat: Option<Chat>,
        pub date: i64,
        pub old_reaction: LossyVec<ReactionType>,
        pub new_reaction: LossyVec<ReactionType>,
    }
}

json_object! {
    /// An incoming update. At most one of the optional fields is set; an
    /// update of a kind not listed here decodes with all of them `None`.
    #[derive(Clone, Debug, PartialEq)]
    pub struct Update {
        pub update_id: i64,
        pub message: Option<Message>,
        pub edited_message: Option<Message>,
        pub channel_post: Option<Message>,
        pub edited_channel_post: Option<Message>,
        pub message_reaction: Option<MessageReactionUpdated>,
    }
}

// ─── Input media ─────────────────────────────────────────────────────────────

json_object! {
    #[derive(Debug)]
    pub struct InputMediaPhoto {
        pub media: InputFile,
        pub caption: Option<String>,
        pub parse_mode: Option<ParseMode>,
        pub caption_entities: Option<Vec<MessageEntity>>,
        pub has_spoiler: Option<bool>,
    }
}

json_object! {
    #[derive(Debug)]
    pub struct InputMediaVideo {
        pub media: InputFile,
        pub thumbnail: Option<InputFile>,
        pub caption: Option<String>,
        pub parse_mode: Option<ParseMode>,
        pub width: Option<i64>,
        pub height: Option<i64>,
        pub duration: Option<i64>,
        pub supports_streaming: Option<bool>,
        pub has_spoiler: Option<bool>,
    }
}

json_object! {
    #[derive(Debug)]
    pub struct InputMediaAnimation {
        pub media: InputFile,
        pub thumbnail: Option<InputFile>,
        pub caption: Option<String>,
        pub parse_mode: Option<ParseMode>,
        pub width: Option<i64>,
        pub height: Option<i64>,
        pub duration: Option<i64>,
        pub has_spoiler: Option<bool>,
    }
}

json_object! {
    #[derive(Debug)]
    pub struct InputMediaAudio {
        pub media: InputFile,
        pub thumbnail: Option<InputFile>,
        pub caption: Option<String>,
        pub parse_mode: Option<ParseMode>,
        pub duration: Option<i64>,
        pub performer: Option<String>,
        pub title: Option<String>,
    }
}

json_object! {
    #[derive(Debug)]
    pub struct InputMediaDocument {
        pub media: InputFile,
        pub thumbnail: Option<InputFile>,
        pub caption: Option<String>,
        pub parse_mode: Option<ParseMode>,
        pub disable_content_type_detection: Option<bool>,
    }
}

impl InputMediaPhoto {
    pub fn new(media: impl Into<InputFile>) -> Self {
        Self { media: media.into(), caption: None, parse_mode: None, caption_entities: None, has_spoiler: None }
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

impl InputMediaVideo {
    pub fn new(media: impl Into<InputFile>) -> Self {
        Self {
            media: media.into(), thumbnail: None, caption: None, parse_mode: None,
            width: None, height: None, duration: None, supports_streaming: None, has_spoiler: None,
        }
    }
}

impl InputMediaAnimation {
    pub fn new(media: impl Into<InputFile>) -> Self {
        Self {
            media: media.into(), thumbnail: None, caption: None, parse_mode: None,
            width: None, height: None, duration: None, has_spoiler: None,
        }
    }
}

impl InputMediaAudio {
    pub fn new(media: impl Into<InputFile>) -> Self {
        Self {
            media: media.into(), thumbnail: None, caption: None, parse_mode: None,
            duration: None, performer: None, title: None,
        }
    }
}

impl InputMediaDocument {
    pub fn new(media: impl Into<InputFile>) -> Self {
        Self {
            media: media.into(), thumbnail: None, caption: None, parse_mode: None,
            disable_content_type_detection: None,
        }
    }

    pub fn thumbnail(mut self, thumbnail: impl Into<InputFile>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

tagged_union! {
    /// An item of an album sent with `sendMediaGroup`.
    #[derive(Debug)]
    pub enum InputMedia : InputMediaKind as "type" {
        Photo(InputMediaPhoto) => Photo,
        Video(InputMediaVideo) => Video,
        Animation(InputMediaAnimation) => Animation,
        Audio(InputMediaAudio) => Audio,
        Document(InputMediaDocument) => Document,
    }
}

// ─── Chat members ────────────────────────────────────────────────────────────

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct ChatMemberOwner {
        pub user: User,
        pub is_anonymous: bool,
        pub custom_title: Option<String>,
    }
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct ChatMemberAdministrator {
        pub user: User,
        pub can_be_edited: bool,
        pub is_anonymous: bool,
        pub can_manage_chat: bool,
        pub can_delete_messages: bool,
        pub can_restrict_members: bool,
        pub can_promote_members: bool,
        pub can_change_info: bool,
        pub can_invite_users: bool,
        pub can_pin_messages: Option<bool>,
        pub custom_title: Option<String>,
    }
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct ChatMemberMember {
        pub user: User,
        pub until_date: Option<i64>,
    }
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct ChatMemberRestricted {
        pub user: User,
        pub is_member: bool,
        pub can_send_messages: bool,
        pub until_date: i64,
    }
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct ChatMemberLeft { pub user: User }
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct ChatMemberBanned {
        pub user: User,
        /// `0` means banned forever.
        pub until_date: i64,
    }
}

tagged_union! {
    /// Information about one member of a chat, told apart by `status`.
    #[derive(Clone, Debug, PartialEq)]
    pub enum ChatMember : ChatMemberStatus as "status" {
        Owner(ChatMemberOwner) => Creator,
        Administrator(ChatMemberAdministrator) => Administrator,
        Member(ChatMemberMember) => Member,
        Restricted(ChatMemberRestricted) => Restricted,
        Left(ChatMemberLeft) => Left,
        Banned(ChatMemberBanned) => Kicked,
    }
}

impl ChatMember {
    pub fn user(&self) -> &User {
        match self {
            Self::Owner(m) => &m.user,
            Self::Administrator(m) => &m.user,
            Self::Member(m) => &m.user,
            Self::Restricted(m) => &m.user,
            Self::Left(m) => &m.user,
            Self::Banned(m) => &m.user,
        }
    }
}

// ─── Command scopes ──────────────────────────────────────────────────────────

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct BotCommandScopeDefault {}
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct BotCommandScopeAllPrivateChats {}
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct BotCommandScopeAllGroupChats {}
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct BotCommandScopeAllChatAdministrators {}
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct BotCommandScopeChat { pub chat_id: ChatId }
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct BotCommandScopeChatAdministrators { pub chat_id: ChatId }
}

json_object! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct BotCommandScopeChatMember {
        pub chat_id: ChatId,
        pub user_id: i64,
    }
}

tagged_union! {
    /// Which users a command list applies to.
    #[derive(Clone, Debug, PartialEq)]
    pub enum BotCommandScope : BotCommandScopeKind as "type" {
        Default(BotCommandScopeDefault) => Default,
        AllPrivateChats(BotCommandScopeAllPrivateChats) => AllPrivateChats,
        AllGroupChats(BotCommandScopeAllGroupChats) => AllGroupChats,
        AllChatAdministrators(BotCommandScopeAllChatAdministrators) => AllChatAdministrators,
        Chat(BotCommandScopeChat) => Chat,
        ChatAdministrators(BotCommandScopeChatAdministrators) => ChatAdministrators,
        ChatMember(BotCommandScopeChatMember) => ChatMember,
    }
}
