use std::fmt::Debug;

use courier_codec::serde_json::{Value, json};
use courier_codec::{Body, EncodeError, ErrorKind, RequestEncoder, TaggedUnion, WireEnum};
use courier_types::enums::{
    BotCommandScopeKind, ChatAction, ChatMemberStatus, ChatType, InputMediaKind,
    MessageEntityType, ParseMode, ReactionTypeKind, StickerType,
};
use courier_types::functions::{
    GetChatMember, GetMe, SendChatAction, SendDocument, SendMediaGroup, SendMessage,
    SetMessageReaction, SetMyCommands,
};
use courier_types::types::{
    BotCommand, BotCommandScope, BotCommandScopeAllChatAdministrators,
    BotCommandScopeAllGroupChats, BotCommandScopeAllPrivateChats, BotCommandScopeChat,
    BotCommandScopeChatAdministrators, BotCommandScopeChatMember, BotCommandScopeDefault, Chat,
    ChatMember, ChatMemberAdministrator, ChatMemberBanned, ChatMemberLeft, ChatMemberMember,
    ChatMemberOwner, ChatMemberRestricted, InputMedia, InputMediaAnimation, InputMediaAudio,
    InputMediaDocument, InputMediaPhoto, InputMediaVideo, Message, MessageReactionUpdated,
    ReactionType, ReactionTypePaid, Update, User,
};
use courier_types::{ChatId, FromJson, Request, ToJson, Upload, check_catalogue};

async fn json_body(body: Body) -> Value {
    assert!(!body.is_multipart());
    courier_codec::serde_json::from_slice(&body.collect().await.unwrap()).unwrap()
}

fn part_names(body: &Body) -> Vec<String> {
    match body {
        Body::Multipart(m) => m.part_names().into_iter().map(str::to_owned).collect(),
        Body::Json(_) => panic!("expected a multipart body"),
    }
}

fn assert_enum_round_trip<E: WireEnum + ToJson + FromJson>() {
    for &(variant, token) in E::TOKENS {
        assert_eq!(variant.encode(), Ok(token), "{}::{variant:?}", E::NAME);
        assert_eq!(E::decode(token), variant, "{}: `{token}`", E::NAME);
        assert_eq!(E::from_json(&variant.to_value().unwrap()).unwrap(), variant);
    }
}

/// Every member of `U`, one instance each, in declaration order.
fn assert_family_round_trip<U>(members: Vec<U>)
where
    U: TaggedUnion + ToJson + FromJson + PartialEq + Debug,
{
    let tags: Vec<U::Tag> = members.iter().map(TaggedUnion::tag).collect();
    assert_eq!(tags, U::MEMBERS, "{}: one instance per member", U::FAMILY);
    for member in members {
        let json = member.to_value().unwrap();
        assert_eq!(json[U::TAG_FIELD], json!(member.tag().encode().unwrap()));
        assert_eq!(U::from_json(&json).unwrap(), member);
    }
}

fn user() -> User {
    User::from_json(&json!({ "id": 9, "is_bot": false, "first_name": "Kim", "username": "kim" })).unwrap()
}

// ── Catalogue ─────────────────────────────────────────────────────────────────

#[test]
fn catalogue_is_consistent() {
    check_catalogue().unwrap();
}

#[test]
fn chat_member_uses_status_discriminator() {
    assert_eq!(ChatMember::TAG_FIELD, "status");
    assert_eq!(ChatMember::MEMBERS.len(), ChatMemberStatus::TOKENS.len());
}

// ── Enums ─────────────────────────────────────────────────────────────────────

#[test]
fn enum_tokens_match_the_api() {
    assert_eq!(ParseMode::MarkdownV2.encode(), Ok("MarkdownV2"));
    assert_eq!(ChatAction::UploadDocument.encode(), Ok("upload_document"));
    assert_eq!(MessageEntityType::decode("text_link"), MessageEntityType::TextLink);
    assert_eq!(BotCommandScopeKind::decode("all_private_chats"), BotCommandScopeKind::AllPrivateChats);
}

#[test]
fn every_declared_variant_round_trips() {
    assert_enum_round_trip::<ParseMode>();
    assert_enum_round_trip::<ChatType>();
    assert_enum_round_trip::<ChatAction>();
    assert_enum_round_trip::<MessageEntityType>();
    assert_enum_round_trip::<StickerType>();
    assert_enum_round_trip::<ReactionTypeKind>();
    assert_enum_round_trip::<InputMediaKind>();
    assert_enum_round_trip::<ChatMemberStatus>();
    assert_enum_round_trip::<BotCommandScopeKind>();
}

#[test]
fn allow_listed_enums_round_trip_unknown() {
    let chat = Chat::from_json(&json!({ "id": -100, "type": "guild", "title": "new kind" })).unwrap();
    assert_eq!(chat.kind, ChatType::Unspecified);
    assert_eq!(chat.to_value().unwrap()["type"], json!("unknown"));

    assert_eq!(MessageEntityType::Unspecified.encode(), Ok("unknown"));
    assert!(ChatAction::Unspecified.encode().is_err());
}

// ── Unions ────────────────────────────────────────────────────────────────────

#[test]
fn reaction_types_resolve_by_type() {
    let emoji = ReactionType::from_json(&json!({ "type": "emoji", "emoji": "👍" })).unwrap();
    assert_eq!(emoji, ReactionType::emoji("👍"));

    let custom = ReactionType::from_json(&json!({ "type": "custom_emoji", "custom_emoji_id": "5368" })).unwrap();
    assert_eq!(custom.tag(), ReactionTypeKind::CustomEmoji);

    let err = ReactionType::from_json(&json!({ "type": "sticker" })).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::UnknownUnionMember { family: "ReactionType", tag: "sticker".into() }
    );
}

#[test]
fn every_reaction_member_round_trips() {
    assert_family_round_trip(vec![
        ReactionType::emoji("👍"),
        ReactionType::custom_emoji("5368"),
        ReactionType::from(ReactionTypePaid {}),
    ]);
}

#[test]
fn every_chat_member_round_trips() {
    assert_family_round_trip(vec![
        ChatMember::from(ChatMemberOwner { user: user(), is_anonymous: false, custom_title: Some("boss".into()) }),
        ChatMember::from(ChatMemberAdministrator {
            user: user(),
            can_be_edited: false,
            is_anonymous: false,
            can_manage_chat: true,
            can_delete_messages: true,
            can_restrict_members: false,
            can_promote_members: false,
            can_change_info: true,
            can_invite_users: true,
            can_pin_messages: Some(true),
            custom_title: None,
        }),
        ChatMember::from(ChatMemberMember { user: user(), until_date: None }),
        ChatMember::from(ChatMemberRestricted {
            user: user(),
            is_member: true,
            can_send_messages: false,
            until_date: 1700000000,
        }),
        ChatMember::from(ChatMemberLeft { user: user() }),
        ChatMember::from(ChatMemberBanned { user: user(), until_date: 0 }),
    ]);
}

#[test]
fn every_command_scope_round_trips() {
    assert_family_round_trip(vec![
        BotCommandScope::from(BotCommandScopeDefault {}),
        BotCommandScope::from(BotCommandScopeAllPrivateChats {}),
        BotCommandScope::from(BotCommandScopeAllGroupChats {}),
        BotCommandScope::from(BotCommandScopeAllChatAdministrators {}),
        BotCommandScope::from(BotCommandScopeChat { chat_id: ChatId::Id(-100) }),
        BotCommandScope::from(BotCommandScopeChatAdministrators { chat_id: "@group".into() }),
        BotCommandScope::from(BotCommandScopeChatMember { chat_id: ChatId::Id(-100), user_id: 5 }),
    ]);
}

#[test]
fn every_input_media_member_resolves() {
    // Input media hold attachments, so they compare through their JSON.
    let members = [
        (InputMediaKind::Photo, InputMedia::from(InputMediaPhoto::new("AgACAgIAAxkBAAI").caption("p"))),
        (InputMediaKind::Video, InputMedia::from(InputMediaVideo::new("https://example.org/v.mp4"))),
        (InputMediaKind::Animation, InputMedia::from(InputMediaAnimation::new("CgACAgIAAxkBAAI"))),
        (InputMediaKind::Audio, InputMedia::from(InputMediaAudio::new("CQACAgIAAxkBAAI"))),
        (InputMediaKind::Document, InputMedia::from(InputMediaDocument::new("BQACAgIAAxkBAAI").thumbnail("AAQC"))),
    ];
    let tags: Vec<_> = members.iter().map(|(tag, _)| *tag).collect();
    assert_eq!(tags, InputMedia::MEMBERS);

    for (tag, media) in members {
        assert_eq!(media.tag(), tag);
        let json = media.to_value().unwrap();
        let back = InputMedia::from_json(&json).unwrap();
        assert_eq!(back.tag(), tag);
        assert_eq!(back.to_value().unwrap(), json);
    }

    let err = InputMedia::from_json(&json!({ "type": "sticker", "media": "x" })).unwrap_err();
    assert!(err.is_unknown_union_member());
}

#[test]
fn reaction_update_skips_unknown_kinds() {
    let update = Update::from_json(&json!({
        "update_id": 10,
        "message_reaction": {
            "chat": { "id": 1, "type": "private", "first_name": "A" },
            "message_id": 5,
            "date": 1700000000,
            "old_reaction": [],
            "new_reaction": [
                { "type": "sticker", "file_id": "x" },
                { "type": "emoji", "emoji": "🎉" }
            ]
        }
    }))
    .unwrap();
    let reaction: &MessageReactionUpdated = update.message_reaction.as_ref().unwrap();
    assert_eq!(&reaction.new_reaction[..], &[ReactionType::emoji("🎉")]);
    assert!(reaction.old_reaction.is_empty());
}

#[test]
fn chat_member_maps_status_to_variant() {
    let user = json!({ "id": 9, "is_bot": false, "first_name": "Kim" });
    let owner = ChatMember::from_json(&json!({ "status": "creator", "user": user.clone(), "is_anonymous": false })).unwrap();
    assert!(matches!(owner, ChatMember::Owner(_)));
    assert_eq!(owner.user().first_name, "Kim");

    let banned = ChatMember::from_json(&json!({ "status": "kicked", "user": user, "until_date": 0 })).unwrap();
    assert_eq!(banned.tag(), ChatMemberStatus::Kicked);
    assert_eq!(
        banned.to_json_string().unwrap(),
        r#"{"status":"kicked","user":{"id":9,"is_bot":false,"first_name":"Kim"},"until_date":0}"#
    );
}

#[test]
fn command_scope_writes_type_first() {
    let scope = BotCommandScope::from(BotCommandScopeChatMember { chat_id: "@channel".into(), user_id: 5 });
    assert_eq!(
        scope.to_json_string().unwrap(),
        r#"{"type":"chat_member","chat_id":"@channel","user_id":5}"#
    );
}

// ── Objects ───────────────────────────────────────────────────────────────────

#[test]
fn chat_id_is_number_or_username() {
    assert_eq!(ChatId::from_json(&json!(-1001)).unwrap(), ChatId::Id(-1001));
    assert_eq!(ChatId::from_json(&json!("@news")).unwrap(), ChatId::from("@news"));
    assert!(ChatId::from_json(&json!(true)).is_err());
    assert_eq!(ChatId::from(7).to_value().unwrap(), json!(7));
}

#[test]
fn messages_decode_with_nested_replies() {
    let msg = Message::from_json(&json!({
        "message_id": 2,
        "date": 1,
        "chat": { "id": 1, "type": "private" },
        "text": "/start now",
        "entities": [{ "type": "bot_command", "offset": 0, "length": 6 }],
        "reply_to_message": {
            "message_id": 1,
            "date": 0,
            "chat": { "id": 1, "type": "private" },
            "caption": "earlier"
        }
    }))
    .unwrap();
    assert_eq!(msg.entities.as_ref().unwrap()[0].kind, MessageEntityType::BotCommand);
    assert_eq!(msg.reply_to_message.as_ref().unwrap().text_or_caption(), Some("earlier"));
}

// ── Requests ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn send_message_encodes_as_json() {
    let req = SendMessage::new(42, "*hi*").parse_mode(ParseMode::MarkdownV2);
    let body = RequestEncoder::default().encode(req).unwrap();
    assert_eq!(
        json_body(body).await,
        json!({ "chat_id": 42, "text": "*hi*", "parse_mode": "MarkdownV2" })
    );
}

#[tokio::test]
async fn get_me_has_no_fields() {
    let body = RequestEncoder::default().encode(GetMe::new()).unwrap();
    assert_eq!(json_body(body).await, json!({}));
}

#[tokio::test]
async fn reactions_and_commands_encode_nested_unions() {
    let req = SetMessageReaction::new("@channel", 3).reaction(vec![ReactionType::emoji("👍")]);
    assert_eq!(
        json_body(RequestEncoder::default().encode(req).unwrap()).await,
        json!({ "chat_id": "@channel", "message_id": 3, "reaction": [{ "type": "emoji", "emoji": "👍" }] })
    );

    let req = SetMyCommands::new([BotCommand { command: "start".into(), description: "Start".into() }])
        .scope(BotCommandScope::from(courier_types::types::BotCommandScopeAllPrivateChats {}));
    assert_eq!(
        json_body(RequestEncoder::default().encode(req).unwrap()).await,
        json!({
            "commands": [{ "command": "start", "description": "Start" }],
            "scope": { "type": "all_private_chats" }
        })
    );
}

#[test]
fn sentinel_action_is_rejected() {
    let err = RequestEncoder::default()
        .encode(SendChatAction::new(1, ChatAction::Unspecified))
        .unwrap_err();
    assert!(matches!(err, EncodeError::Codec(ref e) if e.path().to_string() == "action"));
}

#[test]
fn get_chat_member_requires_user() {
    let err = RequestEncoder::default()
        .encode(GetChatMember::default().chat_id(1))
        .unwrap_err();
    assert!(matches!(err, EncodeError::MissingRequiredField { field: "user_id" }));
    assert!(GetChatMember::FIELDS.iter().all(|f| f.required));
}

#[test]
fn document_with_uploaded_thumbnail_has_two_file_parts() {
    let req = SendDocument::new(1, Upload::from_bytes(&b"%PDF"[..], "report.pdf"))
        .thumbnail(Upload::from_bytes(&b"jpeg"[..], "thumb.jpg"))
        .caption("Q3");
    let body = RequestEncoder::default().encode(req).unwrap();
    assert_eq!(part_names(&body), ["chat_id", "document", "thumbnail", "caption"]);
}

#[tokio::test]
async fn media_group_uploads_nested_thumbnails() {
    let req = SendMediaGroup::new(
        1,
        [
            InputMedia::from(InputMediaPhoto::new("AgACAgIAAxkBAAI").caption("known")),
            InputMedia::from(
                InputMediaDocument::new(Upload::from_bytes(&b"data"[..], "a.csv"))
                    .thumbnail(Upload::from_bytes(&b"img"[..], "a.jpg")),
            ),
        ],
    );
    let body = RequestEncoder::default().encode(req).unwrap();
    assert_eq!(part_names(&body), ["chat_id", "media", "media[1].media", "media[1].thumbnail"]);

    let bytes = body.collect().await.unwrap();
    let text = std::str::from_utf8(&bytes).unwrap();
    assert!(text.contains(
        r#"[{"type":"photo","media":"AgACAgIAAxkBAAI","caption":"known"},{"type":"document","media":"attach://media[1].media","thumbnail":"attach://media[1].thumbnail"}]"#
    ));
}

#[test]
fn responses_decode_into_method_result_types() {
    let sent = <SendMediaGroup as Request>::Response::from_json(&json!([
        { "message_id": 1, "date": 0, "chat": { "id": 1, "type": "private" }, "media_group_id": "g" },
        { "message_id": 2, "date": 0, "chat": { "id": 1, "type": "private" }, "media_group_id": "g" }
    ]))
    .unwrap();
    assert_eq!(sent.len(), 2);
    assert!(<SetMyCommands as Request>::Response::from_json(&json!(true)).unwrap());
}
