// ==========================================
// 校园服务聚合网关 - 页面解析层
// ==========================================
// 职责: 从上游 HTML 页面中抽取结构化数据
// 红线: 不发起网络请求，不做业务对账
// ==========================================

pub mod curriculum_page;
pub mod ecard_page;
pub mod error;
pub mod text;

pub use curriculum_page::{
    extract_grid_cells, extract_sidebar, extract_term_code, extract_user_profile,
};
pub use ecard_page::{extract_account, extract_checkin_rows, extract_page_total};
pub use error::{ExtractError, ExtractResult};
