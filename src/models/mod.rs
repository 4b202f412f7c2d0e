mod contact;
mod conversation;
mod group;

pub use contact::{
    normalize_optional, parse_contact_date, Contact, ContactDraft, ContactEdit, ContactId,
    FieldEdit,
};
pub use conversation::{Category, ConversationEntry, EntryEdit, Importance, TopicEdit, TopicNote};
pub use group::{parse_days, EditReport, Group, GroupEdit, GroupId};

pub(crate) use group::clean_group_name;
