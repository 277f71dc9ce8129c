//! The grammar model (§4.B): the three source grammars and the emended
//! grammar, each a closed tagged union.
//!
//! Source-grammar schemas ([`schema_v2::Swagger2Schema`],
//! [`schema_v30::Oas30Schema`], [`schema_v31::Oas31Schema`]) are flat
//! `serde`-derived structs with one `Option<T>` field per JSON Schema
//! keyword the dialect supports — the same shape the teacher crate's
//! `SchemaV2`/`SchemaV3` use. Discrimination between "this schema is an
//! object" vs. "this schema is an enum of constants" happens procedurally
//! in [`crate::normalize`], not via `serde`'s untagged-enum matching,
//! because every field here is optional and an untagged enum over
//! all-optional variants always matches the first one.
//!
//! Document envelopes ([`envelope`]) are generic over the schema type so
//! the OpenAPI 3.0 and 3.1 envelopes — structurally identical apart from
//! the schema dialect they embed — share one implementation, the same way
//! the teacher's `AdditionalProperties<S>` is generic over the schema type.

pub mod common;
pub mod emended;
pub mod envelope;
pub mod schema_v2;
pub mod schema_v30;
pub mod schema_v31;
pub mod swagger2_doc;

pub use common::{Info, Reference, RefOr, SecurityRequirement, Server, Tag, BoolOrSchema};
pub use emended::{
    ArraySchema, BooleanSchema, Components, ConstantSchema, ContentMap, EmendedDocument,
    HttpMethod, MediaType, NullSchema, NumericSchema, ObjectSchema, OauthFlow, OauthFlows,
    OneOfSchema, Operation, Parameter, ParameterLocation, Path, PathOrReference, ReferenceSchema,
    RequestBody, Response, Schema, SchemaAttributes, SchemaOrBool, SecurityScheme, StringSchema,
    TupleSchema, UnknownSchema,
};
pub use envelope::{
    Oas3Components, Oas3Document, Oas3MediaType, Oas3OauthFlow, Oas3OauthFlows, Oas3Operation,
    Oas3Parameter, Oas3PathItem, Oas3RequestBody, Oas3Response, Oas3SecurityScheme,
};
pub use schema_v2::Swagger2Schema;
pub use schema_v30::Oas30Schema;
pub use schema_v31::{ItemsField, Oas31Schema, TypeField};
pub use swagger2_doc::{
    Swagger2Document, Swagger2Operation, Swagger2Parameter, Swagger2PathItem, Swagger2Response,
    Swagger2SecurityScheme,
};

/// `Oas3Document<Oas30Schema>`.
pub type Oas30Document = Oas3Document<Oas30Schema>;
/// `Oas3Document<Oas31Schema>`.
pub type Oas31Document = Oas3Document<Oas31Schema>;
