//! scanfill-rs: scanline polygon fill with a C ABI for host render loops
use std::ffi::{c_char, c_int, c_uint, c_void, CStr, CString};
use std::ptr;

pub mod active;
pub mod api;
pub mod edge;
pub mod error;
pub mod formats;
pub mod rasterizer;
pub mod surface;

#[cfg(test)]
mod testlib;

pub use api::{PolygonFiller, PolygonFillerBuilder, YAxis};
pub use edge::{Edge, EdgeTable, EdgeTableBuilder, Point, RasterLimits};
pub use error::{codes, FillError};
pub use formats::FormatError;
pub use rasterizer::{FrameStats, ScanlineRasterizer};
pub use surface::{MaskSurface, Span, SpanRecorder, SpanSink};

/// Host span primitive: `(user_data, y, x_enter, x_exit, color)`.
pub type SpanCallback = extern "C" fn(*mut c_void, c_int, c_int, c_int, u8);

pub struct ScanFillHandle {
    filler: PolygonFiller,
    last_error_code: i32,
    last_error_text: CString,
    last_mask: Vec<u8>, // R8 mask buffer
}

impl ScanFillHandle {
    fn new(filler: PolygonFiller) -> Self {
        Self {
            filler,
            last_error_code: codes::OK,
            last_error_text: CString::from(c"OK"),
            last_mask: Vec::new(),
        }
    }

    fn set_ok(&mut self) {
        self.last_error_code = codes::OK;
        self.last_error_text = CString::from(c"OK");
    }

    fn set_error(&mut self, code: i32, text: &str) {
        self.last_error_code = code;
        self.last_error_text = CString::new(text).unwrap_or_default();
    }
}

struct CallbackSink {
    callback: SpanCallback,
    user_data: *mut c_void,
}

impl SpanSink for CallbackSink {
    fn draw_span(&mut self, span: Span) {
        (self.callback)(self.user_data, span.y as c_int, span.x_enter, span.x_exit, span.color);
    }
}

static PLUGIN_NAME: &CStr = c"scanfill-rs";
static PLUGIN_VERSION: &CStr = c"0.1.0";

/// Creates a filler. Zero for either limit selects the default.
#[no_mangle]
pub extern "C" fn PF_create(max_height: c_uint, max_vertices: c_uint) -> *mut ScanFillHandle {
    let mut builder = PolygonFillerBuilder::new();
    if max_height > 0 {
        builder = builder.max_height(max_height as usize);
    }
    if max_vertices > 0 {
        builder = builder.max_vertices(max_vertices as usize);
    }
    Box::into_raw(Box::new(ScanFillHandle::new(builder.build())))
}

#[no_mangle]
pub extern "C" fn PF_destroy(handle: *mut ScanFillHandle) {
    if !handle.is_null() {
        unsafe { drop(Box::from_raw(handle)); }
    }
}

#[no_mangle]
pub extern "C" fn PF_get_name(_handle: *mut ScanFillHandle) -> *const c_char {
    PLUGIN_NAME.as_ptr()
}

#[no_mangle]
pub extern "C" fn PF_get_version(_handle: *mut ScanFillHandle) -> *const c_char {
    PLUGIN_VERSION.as_ptr()
}

#[no_mangle]
pub extern "C" fn PF_get_last_error_code(handle: *mut ScanFillHandle) -> c_int {
    if handle.is_null() { return codes::INVALID_HANDLE; }
    unsafe { (*handle).last_error_code }
}

#[no_mangle]
pub extern "C" fn PF_get_last_error_text(handle: *mut ScanFillHandle) -> *const c_char {
    if handle.is_null() { return c"Invalid handle".as_ptr(); }
    unsafe { (*handle).last_error_text.as_ptr() }
}

#[no_mangle]
pub extern "C" fn PF_get_edge_count(handle: *mut ScanFillHandle) -> c_uint {
    if handle.is_null() { return 0; }
    unsafe { (*handle).filler.edge_count() as c_uint }
}

/// Sets the polygon from `vertex_count` interleaved `x, y` pairs.
#[no_mangle]
pub extern "C" fn PF_set_polygon(handle: *mut ScanFillHandle, xy: *const c_int, vertex_count: usize) -> bool {
    if handle.is_null() {
        return false;
    }
    let h = unsafe { &mut *handle };
    if xy.is_null() && vertex_count > 0 {
        h.set_error(codes::INVALID_ARGUMENT, "Null vertex pointer");
        return false;
    }
    let coords: &[c_int] = if vertex_count == 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(xy, vertex_count * 2) }
    };
    let points: Vec<Point> = coords.chunks_exact(2).map(|c| (c[0], c[1])).collect();
    match h.filler.set_polygon(&points) {
        Ok(()) => {
            h.set_ok();
            true
        }
        Err(e) => {
            h.set_error(e.code(), &e.to_string());
            false
        }
    }
}

/// Loads the polygon from a vertex file (text or polystream, optionally gzipped).
#[no_mangle]
pub extern "C" fn PF_load_file(handle: *mut ScanFillHandle, path: *const c_char) -> bool {
    if handle.is_null() {
        return false;
    }
    let h = unsafe { &mut *handle };
    if path.is_null() {
        h.set_error(codes::INVALID_ARGUMENT, "Null path");
        return false;
    }
    let path = unsafe { CStr::from_ptr(path).to_string_lossy().into_owned() };
    match h.filler.load_file(&path) {
        Ok(_) => {
            h.set_ok();
            true
        }
        Err(e) => {
            h.set_error(e.code(), &e.to_string());
            false
        }
    }
}

/// Runs one frame's sweep, calling `callback` for every span.
#[no_mangle]
pub extern "C" fn PF_fill_frame(handle: *mut ScanFillHandle, callback: Option<SpanCallback>, user_data: *mut c_void) -> bool {
    if handle.is_null() {
        return false;
    }
    let h = unsafe { &mut *handle };
    let Some(callback) = callback else {
        h.set_error(codes::INVALID_ARGUMENT, "Null span callback");
        return false;
    };
    let mut sink = CallbackSink { callback, user_data };
    match h.filler.fill_frame(&mut sink) {
        Ok(_) => {
            h.set_ok();
            true
        }
        Err(e) => {
            h.set_error(e.code(), &e.to_string());
            false
        }
    }
}

/// Renders the polygon into an R8 mask of `width * max_height` bytes owned
/// by the handle; valid until the next call on the handle.
#[no_mangle]
pub extern "C" fn PF_render_mask(handle: *mut ScanFillHandle, width: c_uint) -> *const u8 {
    if handle.is_null() {
        return ptr::null();
    }
    let h = unsafe { &mut *handle };
    match h.filler.render_mask(width as usize) {
        Ok(mask) => {
            h.last_mask = mask;
            h.set_ok();
            h.last_mask.as_ptr()
        }
        Err(e) => {
            h.set_error(e.code(), &e.to_string());
            ptr::null()
        }
    }
}

/// Returns the crate semantic version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
