mod api_info;
mod character_create;
mod character_detail;
mod character_list;

pub use api_info::ApiInfoView;
pub use character_create::CharacterCreateView;
pub use character_detail::CharacterDetailView;
pub use character_list::CharacterListView;
