mod lifecycle;
pub mod page;
mod product;
mod user;

pub use lifecycle::{LifecycleState, Scope};
pub use page::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, Page};
pub use product::{NewProduct, Product, ProductFilter, ProductQuery, ProductStatus, UpdateProduct};
pub use user::{NewUser, UpdateUser, User, UserFilter, UserQuery};
