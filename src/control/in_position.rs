/// Ordered window of the recent absolute position errors with a fixed
/// capacity.
pub struct ErrorWindow {
    _errors: Vec<f64>,
    _capacity: usize,
}

impl ErrorWindow {
    /// Create a new error window.
    ///
    /// # Arguments
    /// * `capacity` - Number of the samples in a full window.
    ///
    /// # Returns
    /// A new error window.
    ///
    /// # Panics
    /// If the capacity is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity of the error window should be > 0.");

        Self {
            _errors: Vec::with_capacity(capacity),
            _capacity: capacity,
        }
    }

    /// Append the absolute value of the error.
    pub fn push(&mut self, error: f64) {
        self._errors.push(error.abs());
    }

    /// The window is full or not.
    pub fn is_full(&self) -> bool {
        self._errors.len() >= self._capacity
    }

    /// Number of the samples in the window.
    pub fn len(&self) -> usize {
        self._errors.len()
    }

    /// The window is empty or not.
    pub fn is_empty(&self) -> bool {
        self._errors.is_empty()
    }

    /// Mean of the absolute errors. Returns None if the window is empty.
    pub fn mean(&self) -> Option<f64> {
        if self._errors.is_empty() {
            None
        } else {
            Some(self._errors.iter().sum::<f64>() / (self._errors.len() as f64))
        }
    }

    /// Clear the window.
    pub fn clear(&mut self) {
        self._errors.clear();
    }
}

pub struct InPosition {
    _window: ErrorWindow,
    // Threshold of the mean absolute error in degree.
    pub threshold: f64,
}

impl InPosition {
    /// InPosition class to determine if the axis is settled.
    ///
    /// # Notes
    /// The window is not rolling. A decision is made only when the window is
    /// full, and the window is cleared after every decision.
    ///
    /// # Arguments
    /// * `window_size` - Number of the samples in a decision.
    /// * `threshold` - Threshold of the mean absolute error in degree.
    ///
    /// # Returns
    /// A new InPosition object.
    pub fn new(window_size: usize, threshold: f64) -> Self {
        Self {
            _window: ErrorWindow::new(window_size),
            threshold,
        }
    }

    /// Add the position error and evaluate the settle condition if the window
    /// is full.
    ///
    /// # Arguments
    /// * `error` - Position error in degree. The sign is ignored.
    ///
    /// # Returns
    /// None if no decision is made in this sample. Otherwise, Some(true) if
    /// the mean absolute error is below the threshold.
    pub fn is_in_position(&mut self, error: f64) -> Option<bool> {
        self._window.push(error);
        if !self._window.is_full() {
            return None;
        }

        let is_settled = self
            ._window
            .mean()
            .is_some_and(|mean| mean < self.threshold);
        self._window.clear();

        Some(is_settled)
    }

    /// Number of the samples waiting for the next decision.
    pub fn num_sample(&self) -> usize {
        self._window.len()
    }

    /// Reset the internal data.
    pub fn reset(&mut self) {
        self._window.clear();
    }
}
