pub mod origin;
pub mod origin_group;
pub mod querystring_parameter;
pub mod registration;

pub use origin::Entity as OriginEntity;
pub use origin_group::Entity as OriginGroupEntity;
pub use querystring_parameter::Entity as QuerystringParameterEntity;
pub use registration::Entity as RegistrationEntity;
