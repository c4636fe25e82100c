// SPDX-License-Identifier: Apache-2.0

mod metrics;

pub(crate) use metrics::{metrics_handler, RequestMetrics};
