//! Node-API addon for `win-account-lookup`.
//!
//! ```js
//! const addon = require('win-account-lookup');
//! addon.get('Administrator');             // { has: true }
//! addon.lookup('Administrator');          // { name, fullName, comment, flags, privilege, sid }
//! addon.lookup('nobody', 'FILESERVER');   // null
//! ```
//!
//! Every export is listed in [`EXPORTS`] and registered from there at module
//! load; nothing else is published to JavaScript.

#![cfg(windows)]

mod codec;

use napi::{CallContext, Callback, Env, JsObject, JsUnknown, Result, Status};
use napi_derive::{js_function, module_exports};
use win_account_lookup::{AccountInfo, Error as LookupError, Privilege, bridge};

/// Exported operations: JavaScript name and implementation.
pub const EXPORTS: &[(&str, Callback)] = &[("get", get), ("lookup", lookup)];

#[module_exports]
fn init(mut exports: JsObject) -> Result<()> {
    for &(name, callback) in EXPORTS {
        exports.create_named_method(name, callback)?;
    }
    Ok(())
}

fn to_js_error(err: LookupError) -> napi::Error {
    let status = match err {
        LookupError::InvalidArgument(_) => Status::InvalidArg,
        _ => Status::GenericFailure,
    };
    napi::Error::new(status, err.to_string())
}

fn optional_string(env: &Env, value: Option<&str>) -> Result<JsUnknown> {
    match value {
        Some(value) => env.create_string(value).map(|s| s.into_unknown()),
        None => env.get_null().map(|null| null.into_unknown()),
    }
}

fn account_object(env: &Env, info: &AccountInfo) -> Result<JsObject> {
    let mut object = env.create_object()?;
    object.set_named_property("name", env.create_string(&info.name)?)?;
    object.set_named_property("fullName", optional_string(env, info.full_name.as_deref())?)?;
    object.set_named_property("comment", optional_string(env, info.comment.as_deref())?)?;
    let flags = match info.flags {
        Some(flags) => env.create_uint32(flags.0)?.into_unknown(),
        None => env.get_null()?.into_unknown(),
    };
    object.set_named_property("flags", flags)?;
    object.set_named_property(
        "privilege",
        optional_string(env, info.privilege.map(Privilege::as_str))?,
    )?;
    object.set_named_property("sid", optional_string(env, info.sid.as_deref())?)?;
    Ok(object)
}

/// `get(accountName: string): { has: boolean }`
#[js_function(1)]
fn get(ctx: CallContext) -> Result<JsObject> {
    let name = codec::string_arg(&ctx, 0)?;
    let presence = bridge::get_wide(&name).map_err(to_js_error)?;
    let mut result = ctx.env.create_object()?;
    result.set_named_property("has", ctx.env.get_boolean(presence.has)?)?;
    Ok(result)
}

/// `lookup(accountName: string, server?: string): object | null`
#[js_function(2)]
fn lookup(ctx: CallContext) -> Result<JsUnknown> {
    let name = codec::string_arg(&ctx, 0)?;
    let server = codec::optional_string_arg(&ctx, 1)?;
    match bridge::lookup_wide(&name, server.as_deref()).map_err(to_js_error)? {
        Some(info) => account_object(ctx.env, &info).map(|object| object.into_unknown()),
        None => ctx.env.get_null().map(|null| null.into_unknown()),
    }
}
