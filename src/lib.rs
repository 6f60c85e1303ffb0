//! # 多尺寸图标生成工具：库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              调用方（CLI / 上层界面）                     │
//! │   提供：源图 + 选中的尺寸    消费：文件名→字节 / ICO / ZIP │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ Result<AssetBundle, FaviconError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            库 (Rust)                             │
//! │                                                          │
//! │  ┌─ error ────── AppError (入口层统一错误类型)            │
//! │  │                                                       │
//! │  └─ favicon ──── 图标生成流水线                          │
//! │      ├─ service    异步入口（spawn_blocking）             │
//! │      ├─ handler    配置快照 + 阶段编排                    │
//! │      ├─ loader     源图读取与限额校验                     │
//! │      ├─ resizer    缩放 + PNG 编码                        │
//! │      ├─ generator  按目录批量生成，单项失败隔离           │
//! │      ├─ ico        ICO 容器逐字节序列化                   │
//! │      ├─ markup     HTML 片段 / webmanifest                │
//! │      └─ archive    ZIP 打包                               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，CLI 的返回类型 |
//! | [`favicon`] | 源图加载、多尺寸缩放、ICO 组装、ZIP 打包、HTML 片段 |

pub mod error;
pub mod favicon;
