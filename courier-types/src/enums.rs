//! Closed enums with their wire tokens.
//!
//! Every enum starts with the `Unspecified` sentinel. `ChatType` and
//! `MessageEntityType` are on the allow-list: the server sends values for
//! them that this catalogue may not know yet, and echoing `"unknown"` back
//! is harmless. Every other enum refuses to encode the sentinel.

use courier_codec::wire_enum;

wire_enum! {
    /// Formatting mode for message text and captions.
    pub enum ParseMode {
        Html => "HTML",
        Markdown => "Markdown",
        MarkdownV2 => "MarkdownV2",
    }
}

wire_enum! {
    /// Kind of a chat.
    pub enum ChatType with unknown {
        Private => "private",
        Group => "group",
        Supergroup => "supergroup",
        Channel => "channel",
        /// Only seen in inline queries: the chat of the query's sender.
        Sender => "sender",
    }
}

wire_enum! {
    /// What the bot is doing, shown to users via `sendChatAction`.
    pub enum ChatAction {
        Typing => "typing",
        UploadPhoto => "upload_photo",
        RecordVideo => "record_video",
        UploadVideo => "upload_video",
        RecordVoice => "record_voice",
        UploadVoice => "upload_voice",
        UploadDocument => "upload_document",
        ChooseSticker => "choose_sticker",
        FindLocation => "find_location",
        RecordVideoNote => "record_video_note",
        UploadVideoNote => "upload_video_note",
    }
}

wire_enum! {
    /// Kind of a text entity.
    pub enum MessageEntityType with unknown {
        Mention => "mention",
        Hashtag => "hashtag",
        Cashtag => "cashtag",
        BotCommand => "bot_command",
        Url => "url",
        Email => "email",
        PhoneNumber => "phone_number",
        Bold => "bold",
        Italic => "italic",
        Underline => "underline",
        Strikethrough => "strikethrough",
        Spoiler => "spoiler",
        Blockquote => "blockquote",
        ExpandableBlockquote => "expandable_blockquote",
        Code => "code",
        Pre => "pre",
        TextLink => "text_link",
        TextMention => "text_mention",
        CustomEmoji => "custom_emoji",
    }
}

wire_enum! {
    pub enum StickerType {
        Regular => "regular",
        Mask => "mask",
        CustomEmoji => "custom_emoji",
    }
}

wire_enum! {
    /// Discriminator of [`ReactionType`](crate::types::ReactionType).
    pub enum ReactionTypeKind {
        Emoji => "emoji",
        CustomEmoji => "custom_emoji",
        Paid => "paid",
    }
}

wire_enum! {
    /// Discriminator of [`InputMedia`](crate::types::InputMedia).
    pub enum InputMediaKind {
        Photo => "photo",
        Video => "video",
        Animation => "animation",
        Audio => "audio",
        Document => "document",
    }
}

wire_enum! {
    /// Discriminator of [`ChatMember`](crate::types::ChatMember).
    pub enum ChatMemberStatus {
        Creator => "creator",
        Administrator => "administrator",
        Member => "member",
        Restricted => "restricted",
        Left => "left",
        Kicked => "kicked",
    }
}

wire_enum! {
    /// Discriminator of [`BotCommandScope`](crate::types::BotCommandScope).
    pub enum BotCommandScopeKind {
        Default => "default",
        AllPrivateChats => "all_private_chats",
        AllGroupChats => "all_group_chats",
        AllChatAdministrators => "all_chat_administrators",
        Chat => "chat",
        ChatAdministrators => "chat_administrators",
        ChatMember => "chat_member",
    }
}
