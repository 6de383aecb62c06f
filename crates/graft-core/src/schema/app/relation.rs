mod belongs_to;
pub use belongs_to::BelongsTo;

mod has_many;
pub use has_many::HasMany;

mod many_to_many;
pub use many_to_many::ManyToMany;
